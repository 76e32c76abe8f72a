//! Feature vectors and markedness of area nodes.
//!
//! Markedness is a weighted sum of visual signals: relative font size,
//! boldness, italics, indentation, contrast, centering, text color variety
//! and background coverage. Two nodes whose markedness differs by less than
//! [`MARKEDNESS_EQUALITY`] are considered equally marked.

use serde::{Deserialize, Serialize};

use crate::area::{AreaId, AreaTree};

use super::centering::is_centered;

/// Markedness difference below which two nodes count as equal.
pub const MARKEDNESS_EQUALITY: f64 = 0.5;

/// Grid columns of indentation after which the indentation score is zero.
const INDENT_STEPS: f64 = 3.0;

/// Whether two markedness values are equal within [`MARKEDNESS_EQUALITY`].
pub fn markedness_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < MARKEDNESS_EQUALITY
}

/// Weights of the markedness components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkednessWeights {
    /// Font size relative to the page average
    pub font_size: f64,
    /// Share of bold text
    pub font_weight: f64,
    /// Share of italic text
    pub font_style: f64,
    /// Indentation score
    pub indentation: f64,
    /// Text/background contrast
    pub contrast: f64,
    /// Centered flag
    pub centering: f64,
    /// One minus the dominant text color share
    pub font_color: f64,
    /// Share of the area covered by its dominant background
    pub background: f64,
}

impl Default for MarkednessWeights {
    fn default() -> Self {
        Self {
            font_size: 1000.0,
            font_weight: 2.0,
            font_style: 0.5,
            indentation: 5.0,
            contrast: 0.0,
            centering: 1.0,
            font_color: 0.5,
            background: 100.0,
        }
    }
}

/// Snapshot of the scoring-relevant attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    /// Average font size relative to the page average
    pub font_size: f64,
    /// Share of bold characters
    pub font_weight: f64,
    /// Share of italic characters
    pub font_style: f64,
    /// Indentation score in `0..=1`
    pub indentation: f64,
    /// Contrast ratio between text and background
    pub contrast: f64,
    /// 1 when centered, 0 otherwise
    pub centered: f64,
    /// One minus the dominant text color share (0 without text)
    pub font_color: f64,
    /// Share of the area covered by its dominant background color
    pub background: f64,
    /// 1 when the node shows replaced content
    pub replaced: f64,
    /// Number of text lines
    pub line_count: usize,
    /// Depth in the area tree
    pub depth: usize,
    /// Number of characters
    pub text_length: usize,
    /// Share of digits
    pub digits: f64,
    /// Share of lowercase letters
    pub lowercase: f64,
    /// Share of uppercase letters
    pub uppercase: f64,
    /// Share of whitespace
    pub spaces: f64,
    /// Share of punctuation
    pub punctuation: f64,
    /// Left edge relative to the page width
    pub relative_x: f64,
    /// Top edge relative to the page height
    pub relative_y: f64,
    /// Luminosity of the dominant text color
    pub text_luminosity: f64,
    /// Luminosity of the background
    pub background_luminosity: f64,
    /// Weighted markedness
    pub markedness: f64,
}

/// Computes feature vectors and markedness.
#[derive(Debug, Clone, Default)]
pub struct FeatureAnalyzer {
    weights: MarkednessWeights,
}

impl FeatureAnalyzer {
    /// Create an analyzer with the given weights.
    pub fn new(weights: MarkednessWeights) -> Self {
        Self { weights }
    }

    /// The markedness weights.
    pub fn weights(&self) -> &MarkednessWeights {
        &self.weights
    }

    /// Compute the markedness of every node whose markedness is not fixed.
    ///
    /// Returns the number of nodes updated.
    pub fn analyze(&self, tree: &mut AreaTree) -> usize {
        tree.update_grids();
        let ids = tree.descendants(tree.root());
        let values: Vec<(AreaId, f64)> = ids
            .into_iter()
            .filter(|id| !tree.node(*id).is_markedness_fixed())
            .map(|id| (id, self.markedness(tree, id)))
            .collect();
        for (id, value) in &values {
            tree.set_markedness(*id, *value);
        }
        log::debug!("FeatureAnalyzer: markedness of {} nodes", values.len());
        values.len()
    }

    /// Markedness of a node. The grids of the tree must be valid.
    pub fn markedness(&self, tree: &AreaTree, id: AreaId) -> f64 {
        let fv = self.basic_features(tree, id);
        self.weigh(&fv)
    }

    fn weigh(&self, fv: &FeatureVector) -> f64 {
        let w = &self.weights;
        w.font_size * fv.font_size
            + w.font_weight * fv.font_weight
            + w.font_style * fv.font_style
            + w.indentation * fv.indentation
            + w.contrast * fv.contrast
            + w.centering * fv.centered
            + w.font_color * fv.font_color
            + w.background * fv.background
    }

    fn basic_features(&self, tree: &AreaTree, id: AreaId) -> FeatureVector {
        let stats = tree.stats(id);
        let page_font = tree.font_size(tree.root());
        let area = tree.area(id);
        let bounds = area.bounds();

        let font_size = if page_font > 0.0 {
            stats.font_size() / page_font
        } else {
            0.0
        };
        let text_color = stats.dominant_color().unwrap_or_default();
        let background = area.efficient_background();

        let mut coverage: std::collections::HashMap<_, i64> = std::collections::HashMap::new();
        for n in tree.descendants(id) {
            for (color, px) in tree.area(n).background_coverage() {
                *coverage.entry(*color).or_insert(0) += px;
            }
        }
        let dominant_bg = coverage.values().copied().max().unwrap_or(0);
        let bg_share = if bounds.area() > 0 {
            (dominant_bg as f64 / bounds.area() as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };

        FeatureVector {
            font_size,
            font_weight: stats.font_weight(),
            font_style: stats.font_style(),
            indentation: indentation(tree, id),
            contrast: text_color.contrast(&background),
            centered: if is_centered(tree, id) { 1.0 } else { 0.0 },
            font_color: if stats.chars > 0 {
                1.0 - stats.dominant_color_percentage()
            } else {
                0.0
            },
            background: bg_share,
            text_luminosity: text_color.luminosity(),
            background_luminosity: background.luminosity(),
            ..Default::default()
        }
    }

    /// Full feature vector of a node, as used by style classifiers.
    pub fn features(&self, tree: &AreaTree, id: AreaId) -> FeatureVector {
        let mut fv = self.basic_features(tree, id);
        let text = tree.text(id);
        let total = text.chars().count();
        let share = |pred: fn(&char) -> bool| {
            if total == 0 {
                0.0
            } else {
                text.chars().filter(pred).count() as f64 / total as f64
            }
        };
        fv.digits = share(|c| c.is_numeric());
        fv.lowercase = share(|c| c.is_lowercase());
        fv.uppercase = share(|c| c.is_uppercase());
        fv.spaces = share(|c| c.is_whitespace());
        fv.punctuation = share(|c| c.is_ascii_punctuation());
        fv.text_length = total;
        fv.replaced = if tree.descendants(id).iter().any(|n| tree.area(*n).is_replaced()) {
            1.0
        } else {
            0.0
        };
        fv.line_count = line_count(tree, id);
        fv.depth = tree.depth(id);

        let page = tree.bounds(tree.root());
        let b = tree.bounds(id);
        if page.width() > 0 && page.height() > 0 {
            fv.relative_x = (b.x1 - page.x1) as f64 / page.width() as f64;
            fv.relative_y = (b.y1 - page.y1) as f64 / page.height() as f64;
        }
        fv.markedness = self.weigh(&fv);
        fv
    }
}

/// Indentation score: full for the leftmost grid column among the
/// siblings, decreasing over [`INDENT_STEPS`] columns. Nodes that continue a
/// line take the score of the line's first node.
fn indentation(tree: &AreaTree, id: AreaId) -> f64 {
    let mut first = id;
    let mut seen = vec![id];
    while let Some(prev) = tree.node(first).previous_on_line() {
        if seen.contains(&prev) || tree.node(prev).is_removed() {
            break;
        }
        seen.push(prev);
        first = prev;
    }

    let Some(parent) = tree.parent(first) else {
        return 1.0;
    };
    let grid = tree.grid(parent);
    let Some(pos) = grid.position(first) else {
        return 0.0;
    };
    let min = grid
        .positions()
        .iter()
        .filter(|(_, r)| !r.is_empty())
        .map(|(_, r)| r.x1)
        .min()
        .unwrap_or(pos.x1);
    let offset = (pos.x1 - min) as f64;
    ((INDENT_STEPS - offset).max(0.0)) / INDENT_STEPS
}

/// Number of text lines among the leaves of a node.
fn line_count(tree: &AreaTree, id: AreaId) -> usize {
    let mut leaves: Vec<_> = tree
        .leaves(id)
        .into_iter()
        .map(|l| tree.bounds(l))
        .collect();
    leaves.sort_by_key(|r| r.y1);
    let mut lines = 0;
    let mut bottom = i32::MIN;
    for r in leaves {
        if r.y1 > bottom {
            lines += 1;
            bottom = r.y2;
        } else {
            bottom = bottom.max(r.y2);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    fn page() -> AreaTree {
        AreaTree::from_spec(
            BoxSpec::viewport(400, 300)
                .with_child(BoxSpec::text("Heading", Rect::new(10, 10, 200, 34)).with_font_size(24.0).bold())
                .with_child(BoxSpec::text("First paragraph text", Rect::new(10, 50, 380, 62)))
                .with_child(BoxSpec::text("Second paragraph text", Rect::new(10, 70, 380, 82))),
        )
        .unwrap()
    }

    #[test]
    fn test_heading_is_more_marked() {
        let tree = page();
        let kids = tree.children(tree.root()).to_vec();
        let fa = FeatureAnalyzer::default();
        let heading = fa.markedness(&tree, kids[0]);
        let body = fa.markedness(&tree, kids[1]);
        assert!(heading > body);
        assert!(!markedness_eq(heading, body));
        assert!(markedness_eq(body, fa.markedness(&tree, kids[2])));
    }

    #[test]
    fn test_markedness_is_deterministic() {
        let tree = page();
        let fa = FeatureAnalyzer::default();
        for id in tree.descendants(tree.root()) {
            assert_eq!(fa.markedness(&tree, id), fa.markedness(&tree, id));
        }
    }

    #[test]
    fn test_analyze_respects_fixed() {
        let mut tree = page();
        let kid = tree.children(tree.root())[1];
        tree.fix_markedness(kid, 7.0);
        let updated = FeatureAnalyzer::default().analyze(&mut tree);
        assert_eq!(updated, 3);
        assert_eq!(tree.node(kid).markedness(), 7.0);
    }

    #[test]
    fn test_full_vector() {
        let tree = page();
        let kid = tree.children(tree.root())[1];
        let fv = FeatureAnalyzer::default().features(&tree, kid);
        assert_eq!(fv.text_length, "First paragraph text".len());
        assert_eq!(fv.line_count, 1);
        assert_eq!(fv.depth, 1);
        assert!(fv.uppercase > 0.0);
        assert!(fv.contrast > 20.0);
        assert_eq!(fv.indentation, 1.0);
    }

    #[test]
    fn test_empty_node_has_zero_ratios() {
        let tree = AreaTree::from_spec(
            BoxSpec::viewport(100, 100).with_child(BoxSpec::image(Rect::new(10, 10, 50, 50))),
        )
        .unwrap();
        let img = tree.children(tree.root())[0];
        let fv = FeatureAnalyzer::default().features(&tree, img);
        assert_eq!(fv.font_size, 0.0);
        assert_eq!(fv.font_color, 0.0);
        assert_eq!(fv.replaced, 1.0);
    }
}
