//! Joining of leaf areas that form one text line.

use crate::area::{AreaId, AreaTree};

use super::AreaTreeOperator;

/// Joins horizontally adjacent leaf areas on the same line.
///
/// For every leaf child of a node the operator looks for the nearest child
/// to its right in the node's grid. The pair is joined when the gap is at
/// most `max_em_space` times the larger font size, the areas overlap
/// vertically and no border or background separates them. With
/// `consistent_style` set, pairs whose styles differ are not joined either.
/// A neighbour on the same line that is not joined is recorded as a
/// same-line link instead.
#[derive(Debug, Clone)]
pub struct FindLineOperator {
    max_em_space: f64,
    consistent_style: bool,
}

impl FindLineOperator {
    /// Create the operator.
    pub fn new(max_em_space: f64, consistent_style: bool) -> Self {
        Self {
            max_em_space,
            consistent_style,
        }
    }

    /// Right-hand grid neighbour of `child` among the children of `node`.
    fn right_neighbour(tree: &AreaTree, node: AreaId, child: AreaId) -> Option<AreaId> {
        let grid = tree.grid(node);
        let pos = grid.position(child)?;
        for col in (pos.x2 as usize + 1)..grid.width() {
            for row in pos.y1 as usize..=pos.y2 as usize {
                if let Some(other) = grid.cell(col, row) {
                    if other != child {
                        return Some(other);
                    }
                }
            }
        }
        None
    }

    /// `right` starts after `left` ends and shares some of its rows.
    fn on_same_line(tree: &AreaTree, left: AreaId, right: AreaId) -> bool {
        let (lb, rb) = (tree.bounds(left), tree.bounds(right));
        lb.intersects_y(&rb) && rb.x1 > lb.x2
    }

    fn joinable(&self, tree: &AreaTree, left: AreaId, right: AreaId) -> bool {
        if !tree.is_leaf(right) || !Self::on_same_line(tree, left, right) {
            return false;
        }
        if self.consistent_style && tree.style(left) != tree.style(right) {
            return false;
        }
        let (a, b) = (tree.area(left), tree.area(right));
        let (lb, rb) = (a.bounds(), b.bounds());
        let em = a.font_size().max(b.font_size());
        let gap = (rb.x1 - lb.x2 - 1) as f64;
        if gap > self.max_em_space * em {
            return false;
        }
        !a.borders().right && !b.borders().left && a.background() == b.background()
    }

    /// Join the first matching pair among the children of `node`.
    fn join_one(&self, tree: &mut AreaTree, node: AreaId) -> bool {
        tree.ensure_grid(node);
        for child in tree.children(node).to_vec() {
            if !tree.is_leaf(child) {
                continue;
            }
            let Some(right) = Self::right_neighbour(tree, node, child) else {
                continue;
            };
            if !self.joinable(tree, child, right) {
                if Self::on_same_line(tree, child, right) {
                    tree.set_line_link(child, right);
                }
                continue;
            }
            log::trace!("FindLineOperator: joining {} and {}", child, right);
            tree.join(child, right);
            return true;
        }
        false
    }
}

impl Default for FindLineOperator {
    fn default() -> Self {
        Self::new(1.5, false)
    }
}

impl AreaTreeOperator for FindLineOperator {
    fn name(&self) -> &'static str {
        "find-line"
    }

    fn apply(&self, tree: &mut AreaTree) -> usize {
        let mut joined = 0;
        for node in tree.descendants(tree.root()) {
            if tree.node(node).is_removed() || tree.is_leaf(node) {
                continue;
            }
            while self.join_one(tree, node) {
                joined += 1;
            }
        }
        tree.update_grids();
        log::debug!("FindLineOperator: {} joins", joined);
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::geometry::{Color, Rect};

    fn hello_world() -> AreaTree {
        AreaTree::from_spec(
            BoxSpec::viewport(200, 100)
                .with_child(BoxSpec::text("Hello", Rect::new(0, 0, 50, 10)))
                .with_child(BoxSpec::text("World", Rect::new(55, 0, 100, 10))),
        )
        .unwrap()
    }

    #[test]
    fn test_joins_words_on_a_line() {
        let mut tree = hello_world();
        let op = FindLineOperator::default();
        assert_eq!(op.apply(&mut tree), 1);
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(kids.len(), 1);
        assert_eq!(tree.bounds(kids[0]), Rect::new(0, 0, 100, 10));
        assert_eq!(tree.text(kids[0]), "Hello World");
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut tree = hello_world();
        let op = FindLineOperator::default();
        op.apply(&mut tree);
        assert_eq!(op.apply(&mut tree), 0);
    }

    #[test]
    fn test_large_gap_is_not_joined() {
        let mut tree = AreaTree::from_spec(
            BoxSpec::viewport(400, 100)
                .with_child(BoxSpec::text("Left", Rect::new(0, 0, 50, 10)))
                .with_child(BoxSpec::text("Right", Rect::new(200, 0, 250, 10))),
        )
        .unwrap();
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(FindLineOperator::default().apply(&mut tree), 0);
        assert_eq!(tree.children(tree.root()).len(), 2);
        assert_eq!(tree.node(kids[0]).next_on_line(), Some(kids[1]));
        assert_eq!(tree.node(kids[1]).previous_on_line(), Some(kids[0]));
    }

    #[test]
    fn test_consistent_style_links_instead_of_joining() {
        let mut tree = AreaTree::from_spec(
            BoxSpec::viewport(200, 100)
                .with_child(BoxSpec::text("Name:", Rect::new(0, 0, 50, 10)).bold())
                .with_child(BoxSpec::text("value", Rect::new(55, 0, 100, 10))),
        )
        .unwrap();
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(FindLineOperator::new(1.5, true).apply(&mut tree), 0);
        assert_eq!(tree.node(kids[0]).next_on_line(), Some(kids[1]));
        assert_eq!(tree.node(kids[1]).previous_on_line(), Some(kids[0]));
    }

    #[test]
    fn test_background_blocks_join() {
        let mut tree = AreaTree::from_spec(
            BoxSpec::viewport(200, 100)
                .with_child(BoxSpec::text("Plain", Rect::new(0, 0, 50, 10)))
                .with_child(
                    BoxSpec::text("Marked", Rect::new(55, 0, 100, 10)).with_background(Color::rgb(255, 255, 0)),
                ),
        )
        .unwrap();
        let kids = tree.children(tree.root()).to_vec();
        assert_eq!(FindLineOperator::default().apply(&mut tree), 0);
        assert_eq!(tree.node(kids[0]).next_on_line(), Some(kids[1]));
    }

    #[test]
    fn test_rows_below_are_not_linked() {
        let mut tree = AreaTree::from_spec(
            BoxSpec::viewport(400, 100)
                .with_child(BoxSpec::text("Upper", Rect::new(0, 0, 50, 10)))
                .with_child(BoxSpec::text("Lower", Rect::new(200, 30, 250, 40))),
        )
        .unwrap();
        let kids = tree.children(tree.root()).to_vec();
        FindLineOperator::default().apply(&mut tree);
        assert_eq!(tree.node(kids[0]).next_on_line(), None);
        assert_eq!(tree.node(kids[1]).previous_on_line(), None);
    }
}
