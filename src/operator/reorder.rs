//! Reading-order repair among siblings on the same line.

use crate::area::AreaTree;

use super::AreaTreeOperator;

/// Swaps adjacent siblings that overlap vertically but appear in reverse
/// horizontal order, until no such pair is left. Children of atomic nodes
/// keep their order.
#[derive(Debug, Clone, Default)]
pub struct ReorderOperator;

impl ReorderOperator {
    /// Create the operator.
    pub fn new() -> Self {
        Self
    }
}

impl AreaTreeOperator for ReorderOperator {
    fn name(&self) -> &'static str {
        "reorder"
    }

    fn apply(&self, tree: &mut AreaTree) -> usize {
        let mut swaps = 0;
        for node in tree.descendants(tree.root()) {
            if tree.node(node).is_atomic() {
                continue;
            }
            // every swap removes one x1 inversion, so this terminates
            let mut changed = true;
            while changed {
                changed = false;
                let kids = tree.children(node).to_vec();
                for i in 1..kids.len() {
                    let prev = tree.bounds(kids[i - 1]);
                    let cur = tree.bounds(kids[i]);
                    if prev.intersects_y(&cur) && cur.x2 < prev.x1 {
                        tree.swap_children(node, i - 1, i);
                        swaps += 1;
                        changed = true;
                        break;
                    }
                }
            }
        }
        tree.update_grids();
        log::debug!("ReorderOperator: {} swaps", swaps);
        swaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    fn reversed() -> AreaTree {
        AreaTree::from_spec(
            BoxSpec::viewport(300, 100)
                .with_child(BoxSpec::text("third", Rect::new(200, 0, 250, 10)))
                .with_child(BoxSpec::text("second", Rect::new(100, 0, 150, 10)))
                .with_child(BoxSpec::text("first", Rect::new(0, 0, 50, 10)))
                .with_child(BoxSpec::text("below", Rect::new(0, 50, 50, 60))),
        )
        .unwrap()
    }

    #[test]
    fn test_reorders_line() {
        let mut tree = reversed();
        let swaps = ReorderOperator::new().apply(&mut tree);
        assert_eq!(swaps, 3);
        assert_eq!(tree.text(tree.root()), "first second third below");
        assert_eq!(ReorderOperator::new().apply(&mut tree), 0);
    }

    #[test]
    fn test_atomic_node_keeps_order() {
        let mut tree = reversed();
        let root = tree.root();
        tree.set_atomic(root, true);
        assert_eq!(ReorderOperator::new().apply(&mut tree), 0);
        assert_eq!(tree.text(root), "third second first below");
    }
}
