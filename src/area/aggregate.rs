//! Geometric and style aggregate of one or more boxes.

use std::collections::HashMap;

use serde::Serialize;

use crate::boxes::{BoxId, BoxNode, BoxTree};
use crate::geometry::{Color, Rect};

/// Border flags per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Borders {
    /// Top border present
    pub top: bool,
    /// Right border present
    pub right: bool,
    /// Bottom border present
    pub bottom: bool,
    /// Left border present
    pub left: bool,
}

impl Borders {
    /// Number of sides with a border.
    pub fn count(&self) -> usize {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .filter(|b| **b)
            .count()
    }

    /// Whether any side has a border.
    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

/// Font and color statistics weighted by text length.
///
/// Sums are kept instead of averages so that joining two areas is a plain
/// addition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStats {
    /// Number of characters
    pub chars: usize,
    /// Sum of font size times characters
    pub font_size_sum: f64,
    /// Number of bold characters
    pub bold_chars: usize,
    /// Number of italic characters
    pub italic_chars: usize,
    /// Characters per text color
    pub colors: HashMap<Color, usize>,
}

impl TextStats {
    /// Account for a text run.
    pub fn add_run(&mut self, chars: usize, font_size: f32, bold: bool, italic: bool, color: Color) {
        if chars == 0 {
            return;
        }
        self.chars += chars;
        self.font_size_sum += font_size as f64 * chars as f64;
        if bold {
            self.bold_chars += chars;
        }
        if italic {
            self.italic_chars += chars;
        }
        *self.colors.entry(color).or_insert(0) += chars;
    }

    /// Add all statistics of `other`.
    pub fn merge(&mut self, other: &TextStats) {
        self.chars += other.chars;
        self.font_size_sum += other.font_size_sum;
        self.bold_chars += other.bold_chars;
        self.italic_chars += other.italic_chars;
        for (color, n) in &other.colors {
            *self.colors.entry(*color).or_insert(0) += n;
        }
    }

    /// Average font size, 0 without text.
    pub fn font_size(&self) -> f64 {
        ratio(self.font_size_sum, self.chars)
    }

    /// Fraction of bold characters.
    pub fn font_weight(&self) -> f64 {
        ratio(self.bold_chars as f64, self.chars)
    }

    /// Fraction of italic characters.
    pub fn font_style(&self) -> f64 {
        ratio(self.italic_chars as f64, self.chars)
    }

    /// The text color used by most characters.
    pub fn dominant_color(&self) -> Option<Color> {
        self.colors
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(c, _)| *c)
    }

    /// Share of characters in the dominant text color.
    pub fn dominant_color_percentage(&self) -> f64 {
        let max = self.colors.values().copied().max().unwrap_or(0);
        ratio(max as f64, self.chars)
    }
}

fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// A visual area: one or more boxes sharing a declared rectangle.
#[derive(Debug, Clone)]
pub struct Area {
    bounds: Rect,
    content_bounds: Rect,
    boxes: Vec<BoxId>,
    borders: Borders,
    background: Option<Color>,
    efficient_background: Color,
    background_separated: bool,
    replaced: bool,
    text: String,
    stats: TextStats,
    background_coverage: HashMap<Color, i64>,
}

impl Area {
    /// Create an empty synthetic area covering `bounds`.
    pub fn new(bounds: Rect, efficient_background: Color) -> Self {
        Self {
            bounds,
            content_bounds: bounds,
            boxes: Vec::new(),
            borders: Borders::default(),
            background: None,
            efficient_background,
            background_separated: false,
            replaced: false,
            text: String::new(),
            stats: TextStats::default(),
            background_coverage: HashMap::new(),
        }
    }

    /// Create an area from a single box of the box tree.
    pub fn from_box(tree: &BoxTree, id: BoxId) -> Self {
        let node = tree.node(id);
        let content = node.visual_bounds().unwrap_or_else(|| node.content_bounds());
        let mut area = Self::new(node.bounds(), node.efficient_background());
        area.content_bounds = content;
        area.boxes.push(id);
        area.borders = Borders {
            top: node.border().top > 0,
            right: node.border().right > 0,
            bottom: node.border().bottom > 0,
            left: node.border().left > 0,
        };
        if node.is_background_separated() {
            area.background = node.background();
            area.background_separated = true;
            if let Some(bg) = node.background() {
                area.background_coverage.insert(bg, content.area());
            }
        }
        area.replaced = node.is_replaced();
        area.add_box_text(node);
        area
    }

    fn add_box_text(&mut self, node: &BoxNode) {
        if let Some(text) = node.text() {
            let font = node.font();
            self.stats
                .add_run(text.chars().count(), font.size, font.bold, font.italic, node.color());
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(text);
        }
    }

    /// Declared bounds (encloses the content bounds).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Tight bounds of the visible content.
    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    /// Boxes aggregated in this area.
    pub fn boxes(&self) -> &[BoxId] {
        &self.boxes
    }

    /// Border flags.
    pub fn borders(&self) -> Borders {
        self.borders
    }

    /// Own background color, if it differs from the surroundings.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Background in effect (own or inherited).
    pub fn efficient_background(&self) -> Color {
        self.efficient_background
    }

    /// Whether the background separates the area from its parent.
    pub fn is_background_separated(&self) -> bool {
        self.background_separated
    }

    /// Whether the area shows replaced content (images).
    pub fn is_replaced(&self) -> bool {
        self.replaced
    }

    /// Own text (not including child areas).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Own text statistics.
    pub fn stats(&self) -> &TextStats {
        &self.stats
    }

    /// Average font size of the own text.
    pub fn font_size(&self) -> f64 {
        self.stats.font_size()
    }

    /// Pixels covered per background color.
    pub fn background_coverage(&self) -> &HashMap<Color, i64> {
        &self.background_coverage
    }

    /// Whether the area is a thin rule: no text, no image, at most 3 px thick.
    pub fn is_rule(&self) -> bool {
        self.text.is_empty()
            && !self.replaced
            && (self.borders.any() || self.background_separated)
            && self.content_bounds.width().min(self.content_bounds.height()) <= 3
    }

    /// Grow the declared bounds.
    pub fn extend_bounds(&mut self, other: &Rect) {
        self.bounds.expand_to_enclose(other);
    }

    /// Absorb another area.
    ///
    /// Bounds and content bounds are united, statistics added and texts
    /// concatenated. On every side the border of whichever area lies nearer
    /// to that side of the union survives.
    pub fn absorb(&mut self, other: &Area) {
        let union = self.bounds.union(&other.bounds);
        let pick = |mine: bool, theirs: bool, my_edge: i32, their_edge: i32, edge: i32| {
            match (my_edge == edge, their_edge == edge) {
                (true, true) => mine || theirs,
                (true, false) => mine,
                (false, true) => theirs,
                (false, false) => false,
            }
        };
        self.borders = Borders {
            top: pick(self.borders.top, other.borders.top, self.bounds.y1, other.bounds.y1, union.y1),
            right: pick(
                self.borders.right,
                other.borders.right,
                self.bounds.x2,
                other.bounds.x2,
                union.x2,
            ),
            bottom: pick(
                self.borders.bottom,
                other.borders.bottom,
                self.bounds.y2,
                other.bounds.y2,
                union.y2,
            ),
            left: pick(
                self.borders.left,
                other.borders.left,
                self.bounds.x1,
                other.bounds.x1,
                union.x1,
            ),
        };
        self.bounds = union;
        self.content_bounds = self.content_bounds.union(&other.content_bounds);
        self.boxes.extend_from_slice(&other.boxes);
        self.replaced |= other.replaced;
        if self.background.is_none() && other.background.is_some() {
            self.background = other.background;
            self.background_separated = other.background_separated;
        }
        self.stats.merge(&other.stats);
        for (color, px) in &other.background_coverage {
            *self.background_coverage.entry(*color).or_insert(0) += px;
        }
        if !other.text.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(&other.text);
        }
    }

    /// Replace the aggregated boxes and text with the content of a whole
    /// subtree, keeping the geometry.
    pub(crate) fn replace_content(&mut self, boxes: Vec<BoxId>, text: String, stats: TextStats) {
        self.boxes = boxes;
        self.text = text;
        self.stats = stats;
    }
}
