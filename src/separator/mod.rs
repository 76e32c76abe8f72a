//! Separators: empty-space dividers inside an area.
//!
//! A [`SeparatorStrategy`] looks at the children of one area node and
//! returns a [`SeparatorSet`] of horizontal and vertical separators, each
//! running edge to edge across the area (or across a filter rectangle).
//! Three strategies are available:
//!
//! - [`GridSeparators`]: empty rows and columns of the node's grid
//! - [`ColumnSeparators`]: carving children out of whole-area separators,
//!   recursing into horizontal bands when no column is found
//! - [`SimultaneousSeparators`]: experimental single-pass variant
//!
//! All strategies share the post-processing in this module: separators that
//! touch the area's border are dropped, collinear vertical separators are
//! joined, thin rule areas are reported as box separators, and weights are
//! computed from the separator size and the areas on both sides.

mod columns;
mod grid;
mod simultaneous;

pub use columns::ColumnSeparators;
pub use grid::GridSeparators;
pub use simultaneous::SimultaneousSeparators;

use serde::{Deserialize, Serialize};

use crate::area::{AreaId, AreaTree};
use crate::geometry::Rect;

/// Weight assigned to separators formed by rule areas.
pub const BOX_SEPARATOR_WEIGHT: i32 = 20;

/// Orientation and origin of a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeparatorKind {
    /// Horizontal band of empty space
    Horizontal,
    /// Vertical band of empty space
    Vertical,
    /// Horizontal rule drawn by a box
    BoxHorizontal,
    /// Vertical rule drawn by a box
    BoxVertical,
}

impl SeparatorKind {
    /// Whether the separator divides content above from content below.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, SeparatorKind::Horizontal | SeparatorKind::BoxHorizontal)
    }

    /// Whether the separator divides content left from content right.
    pub fn is_vertical(&self) -> bool {
        !self.is_horizontal()
    }
}

/// A separator with its weight and the areas it separates.
#[derive(Debug, Clone, PartialEq)]
pub struct Separator {
    rect: Rect,
    kind: SeparatorKind,
    weight: i32,
    first: Option<AreaId>,
    second: Option<AreaId>,
}

impl Separator {
    /// Create an unweighted separator.
    pub fn new(rect: Rect, kind: SeparatorKind) -> Self {
        Self {
            rect,
            kind,
            weight: 0,
            first: None,
            second: None,
        }
    }

    /// Covered rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Orientation and origin.
    pub fn kind(&self) -> SeparatorKind {
        self.kind
    }

    /// Visual strength.
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Area above (horizontal) or left of (vertical) the separator.
    pub fn first(&self) -> Option<AreaId> {
        self.first
    }

    /// Area below (horizontal) or right of (vertical) the separator.
    pub fn second(&self) -> Option<AreaId> {
        self.second
    }

    /// Whether the separator is horizontal.
    pub fn is_horizontal(&self) -> bool {
        self.kind.is_horizontal()
    }

    /// Whether the separator is vertical.
    pub fn is_vertical(&self) -> bool {
        self.kind.is_vertical()
    }
}

/// Tunables shared by the separator strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparatorOptions {
    /// Font size difference (px) across a horizontal separator that adds weight
    pub font_size_threshold: f64,
    /// Band below the strongest weight within which separators still qualify
    pub weight_tolerance: i32,
    /// Separators lighter than this are dropped
    pub min_weight: i32,
    /// Maximum recursion depth of the column search
    pub max_column_depth: usize,
}

impl Default for SeparatorOptions {
    fn default() -> Self {
        Self {
            font_size_threshold: 0.5,
            weight_tolerance: 1,
            min_weight: 1,
            max_column_depth: 8,
        }
    }
}

/// Separators found in one area node, sorted by descending weight.
#[derive(Debug, Clone)]
pub struct SeparatorSet {
    node: AreaId,
    epoch: u64,
    horizontal: Vec<Separator>,
    vertical: Vec<Separator>,
    boxes: Vec<Separator>,
}

impl SeparatorSet {
    /// An empty set for a node.
    pub fn empty(tree: &AreaTree, node: AreaId) -> Self {
        Self {
            node,
            epoch: tree.epoch(node),
            horizontal: Vec::new(),
            vertical: Vec::new(),
            boxes: Vec::new(),
        }
    }

    /// The node the separators were computed for.
    pub fn node(&self) -> AreaId {
        self.node
    }

    /// Epoch of the node when the set was computed.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the node has not changed since the set was computed.
    pub fn is_valid_for(&self, tree: &AreaTree) -> bool {
        tree.epoch(self.node) == self.epoch
    }

    /// Horizontal empty-space separators.
    pub fn horizontal(&self) -> &[Separator] {
        &self.horizontal
    }

    /// Vertical empty-space separators.
    pub fn vertical(&self) -> &[Separator] {
        &self.vertical
    }

    /// Separators formed by rule areas.
    pub fn box_separators(&self) -> &[Separator] {
        &self.boxes
    }

    /// All separators, strongest first.
    pub fn all(&self) -> Vec<&Separator> {
        let mut all: Vec<&Separator> = self
            .horizontal
            .iter()
            .chain(&self.vertical)
            .chain(&self.boxes)
            .collect();
        all.sort_by(|a, b| b.weight.cmp(&a.weight));
        all
    }

    /// Total number of separators.
    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len() + self.boxes.len()
    }

    /// Whether no separator was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The strongest separator.
    pub fn most_important(&self) -> Option<&Separator> {
        self.all().into_iter().next()
    }

    /// The strongest separator covering a point.
    pub fn separator_at(&self, x: i32, y: i32) -> Option<&Separator> {
        self.all().into_iter().find(|s| s.rect.contains(x, y))
    }

    /// Separators at least as strong as the strongest one minus `tolerance`.
    ///
    /// When `orientation_of_strongest` is set, only separators of the
    /// strongest separator's orientation qualify.
    pub fn qualifying(&self, tolerance: i32, orientation_of_strongest: bool) -> Vec<&Separator> {
        let Some(top) = self.most_important() else {
            return Vec::new();
        };
        let threshold = top.weight - tolerance;
        let horizontal = top.is_horizontal();
        self.all()
            .into_iter()
            .filter(|s| s.weight >= threshold)
            .filter(|s| !orientation_of_strongest || s.is_horizontal() == horizontal)
            .collect()
    }
}

/// A way of finding separators inside an area node.
///
/// The node's grid must be valid (see [`AreaTree::ensure_grid`]).
pub trait SeparatorStrategy: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Find the separators among the children of `node`, optionally
    /// restricted to `filter`.
    fn find(&self, tree: &AreaTree, node: AreaId, filter: Option<Rect>) -> SeparatorSet;
}

/// Available separator strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeparatorStrategyKind {
    /// Carve children out of whole-area separators
    #[default]
    Columns,
    /// Empty rows and columns of the grid
    Grid,
    /// Experimental single-child carving
    Simultaneous,
}

impl SeparatorStrategyKind {
    /// Instantiate the strategy.
    pub fn build(&self, options: &SeparatorOptions) -> Box<dyn SeparatorStrategy> {
        match self {
            SeparatorStrategyKind::Columns => Box::new(ColumnSeparators::new(options.clone())),
            SeparatorStrategyKind::Grid => Box::new(GridSeparators::new(options.clone())),
            SeparatorStrategyKind::Simultaneous => {
                Box::new(SimultaneousSeparators::new(options.clone()))
            }
        }
    }
}

/// The rectangle a strategy works in.
pub(crate) fn region(tree: &AreaTree, node: AreaId, filter: Option<Rect>) -> Rect {
    let bounds = tree.bounds(node);
    match filter {
        Some(f) => bounds.intersection(&f),
        None => bounds,
    }
}

/// Children that carve empty space (everything except rules), with bounds.
pub(crate) fn content_children(tree: &AreaTree, node: AreaId, region: &Rect) -> Vec<(AreaId, Rect)> {
    tree.children(node)
        .iter()
        .filter(|c| !tree.area(**c).is_rule())
        .map(|c| (*c, tree.bounds(*c)))
        .filter(|(_, r)| r.intersects(region))
        .collect()
}

/// Drop separators touching the region border on their separating sides.
pub(crate) fn remove_marginal(horizontal: &mut Vec<Rect>, vertical: &mut Vec<Rect>, region: &Rect) {
    horizontal.retain(|s| !s.is_empty() && s.y1 > region.y1 && s.y2 < region.y2);
    vertical.retain(|s| !s.is_empty() && s.x1 > region.x1 && s.x2 < region.x2);
}

/// Merge vertical separators that continue each other with no content in
/// between.
pub(crate) fn join_vertical(vertical: &mut Vec<Rect>, content: &[(AreaId, Rect)]) {
    vertical.sort_by_key(|r| (r.y1, r.x1));
    let mut changed = true;
    while changed {
        changed = false;
        'outer: for i in 0..vertical.len() {
            for j in 0..vertical.len() {
                if i == j {
                    continue;
                }
                let (a, b) = (vertical[i], vertical[j]);
                if a.y1 > b.y1 || !a.intersects_x(&b) {
                    continue;
                }
                let x1 = a.x1.max(b.x1);
                let x2 = a.x2.min(b.x2);
                let gap = Rect::new(x1, a.y2 + 1, x2, b.y1 - 1);
                let blocked = !gap.is_empty() && content.iter().any(|(_, r)| r.intersects(&gap));
                if b.y1 > a.y2 + 1 && blocked {
                    continue;
                }
                vertical[i] = Rect::new(x1, a.y1.min(b.y1), x2, a.y2.max(b.y2));
                vertical.remove(j);
                changed = true;
                break 'outer;
            }
        }
    }
}

/// Keep horizontal separators pairwise disjoint, preferring larger ones.
pub(crate) fn disjoint_horizontal(horizontal: &mut Vec<Rect>) {
    horizontal.sort_by_key(|r| std::cmp::Reverse(r.area()));
    let mut kept: Vec<Rect> = Vec::with_capacity(horizontal.len());
    for r in horizontal.drain(..) {
        if !kept.iter().any(|k| k.intersects(&r)) {
            kept.push(r);
        }
    }
    kept.sort_by_key(|r| (r.y1, r.x1));
    *horizontal = kept;
}

/// Turn raw rectangles into a weighted, sorted separator set.
pub(crate) fn finish(
    tree: &AreaTree,
    node: AreaId,
    region: Rect,
    mut horizontal: Vec<Rect>,
    mut vertical: Vec<Rect>,
    options: &SeparatorOptions,
) -> SeparatorSet {
    let content = content_children(tree, node, &region);
    remove_marginal(&mut horizontal, &mut vertical, &region);
    join_vertical(&mut vertical, &content);
    disjoint_horizontal(&mut horizontal);

    let mut set = SeparatorSet::empty(tree, node);
    for rect in horizontal {
        let sep = weigh(tree, &content, Separator::new(rect, SeparatorKind::Horizontal), options);
        if sep.weight >= options.min_weight {
            set.horizontal.push(sep);
        }
    }
    for rect in vertical {
        let sep = weigh(tree, &content, Separator::new(rect, SeparatorKind::Vertical), options);
        if sep.weight >= options.min_weight {
            set.vertical.push(sep);
        }
    }
    for child in tree.children(node) {
        let area = tree.area(*child);
        if !area.is_rule() {
            continue;
        }
        let rect = area.content_bounds().intersection(&region);
        if rect.is_empty() {
            continue;
        }
        let kind = if rect.width() >= rect.height() {
            SeparatorKind::BoxHorizontal
        } else {
            SeparatorKind::BoxVertical
        };
        let mut sep = weigh(tree, &content, Separator::new(rect, kind), options);
        sep.weight = BOX_SEPARATOR_WEIGHT;
        set.boxes.push(sep);
    }

    set.horizontal.sort_by(|a, b| b.weight.cmp(&a.weight));
    set.vertical.sort_by(|a, b| b.weight.cmp(&a.weight));
    log::trace!(
        "SeparatorSet: area {}: {} horizontal, {} vertical, {} box",
        node,
        set.horizontal.len(),
        set.vertical.len(),
        set.boxes.len()
    );
    set
}

/// Find the neighbouring areas of a separator and compute its weight.
fn weigh(tree: &AreaTree, content: &[(AreaId, Rect)], mut sep: Separator, options: &SeparatorOptions) -> Separator {
    let r = sep.rect;
    let (first, second) = if sep.is_horizontal() {
        let above = content
            .iter()
            .filter(|(_, c)| c.intersects_x(&r) && c.y2 < r.y1)
            .max_by_key(|(_, c)| c.y2);
        let below = content
            .iter()
            .filter(|(_, c)| c.intersects_x(&r) && c.y1 > r.y2)
            .min_by_key(|(_, c)| c.y1);
        (above.map(|a| a.0), below.map(|a| a.0))
    } else {
        let left = content
            .iter()
            .filter(|(_, c)| c.intersects_y(&r) && c.x2 < r.x1)
            .max_by_key(|(_, c)| c.x2);
        let right = content
            .iter()
            .filter(|(_, c)| c.intersects_y(&r) && c.x1 > r.x2)
            .min_by_key(|(_, c)| c.x1);
        (left.map(|a| a.0), right.map(|a| a.0))
    };
    sep.first = first;
    sep.second = second;

    let mut weight = r.width().min(r.height()) / 10;
    if sep.is_vertical() {
        weight *= 2;
    }
    if let (Some(a), Some(b)) = (first, second) {
        if tree.area(a).efficient_background() != tree.area(b).efficient_background() {
            weight += 4;
        }
        if tree.style(a) != tree.style(b) {
            weight += 2;
        }
        if sep.is_horizontal() && tree.font_size(b) - tree.font_size(a) > options.font_size_threshold {
            weight += 2;
        }
    }
    sep.weight = weight;
    sep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_marginal() {
        let region = Rect::new(0, 0, 99, 99);
        let mut h = vec![Rect::new(0, 0, 99, 9), Rect::new(0, 40, 99, 49), Rect::new(0, 90, 99, 99)];
        let mut v = vec![Rect::new(0, 0, 9, 99), Rect::new(50, 0, 59, 99)];
        remove_marginal(&mut h, &mut v, &region);
        assert_eq!(h, vec![Rect::new(0, 40, 99, 49)]);
        assert_eq!(v, vec![Rect::new(50, 0, 59, 99)]);
    }

    #[test]
    fn test_join_vertical_continuation() {
        let mut v = vec![Rect::new(50, 0, 59, 40), Rect::new(52, 41, 60, 99)];
        join_vertical(&mut v, &[]);
        assert_eq!(v, vec![Rect::new(52, 0, 59, 99)]);
    }

    #[test]
    fn test_join_vertical_blocked_by_content() {
        let mut v = vec![Rect::new(50, 0, 59, 30), Rect::new(50, 50, 59, 99)];
        let content = vec![(AreaId(1), Rect::new(0, 35, 99, 45))];
        join_vertical(&mut v, &content);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_disjoint_horizontal() {
        let mut h = vec![Rect::new(0, 10, 99, 19), Rect::new(20, 15, 40, 25), Rect::new(0, 50, 99, 59)];
        disjoint_horizontal(&mut h);
        assert_eq!(h, vec![Rect::new(0, 10, 99, 19), Rect::new(0, 50, 99, 59)]);
    }

    #[test]
    fn test_kind_orientation() {
        assert!(SeparatorKind::BoxHorizontal.is_horizontal());
        assert!(SeparatorKind::Vertical.is_vertical());
        assert!(SeparatorKind::BoxVertical.is_vertical());
    }
}
