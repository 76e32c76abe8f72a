//! Splitting of tables and lists out of mixed content.

use crate::analysis::LayoutAnalyzer;
use crate::area::{AreaId, AreaTree, LayoutType};

use super::AreaTreeOperator;

/// Wraps table and list runs found among a node's children into their own
/// areas.
///
/// A run must have at least two children and must not cover the whole child
/// list (that case is a plain layout classification). The children before
/// and after the run are wrapped too when there are at least two of them.
#[derive(Debug, Clone, Default)]
pub struct LayoutSplitOperator {
    analyzer: LayoutAnalyzer,
}

impl LayoutSplitOperator {
    /// Create the operator with a default layout analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// First table or list run among `children`.
    fn find_run(&self, tree: &AreaTree, node: AreaId, children: &[AreaId]) -> Option<(usize, usize, LayoutType)> {
        for start in 0..children.len() {
            if let Some(end) = self.analyzer.find_table_end(tree, node, children, start) {
                if end > start {
                    return Some((start, end, LayoutType::Table));
                }
            }
            if let Some((end, _)) = self.analyzer.list_run(tree, node, children, start) {
                if end > start {
                    return Some((start, end, LayoutType::List));
                }
            }
        }
        None
    }

    fn split(&self, tree: &mut AreaTree, node: AreaId) -> usize {
        tree.ensure_grid(node);
        let children = tree.children(node).to_vec();
        if children.len() < 3 {
            return 0;
        }
        let Some((start, end, layout)) = self.find_run(tree, node, &children) else {
            return 0;
        };
        if start == 0 && end == children.len() - 1 {
            return 0;
        }
        log::trace!("LayoutSplitOperator: {:?} in {} at {}..={}", layout, node, start, end);

        let mut created = 0;
        let before = &children[..start];
        let after = &children[end + 1..];
        if before.len() >= 2 && tree.create_super_area(node, before).is_some() {
            created += 1;
        }
        if let Some(run) = tree.create_super_area(node, &children[start..=end]) {
            tree.set_layout(run, layout);
            created += 1;
        }
        if after.len() >= 2 && tree.create_super_area(node, after).is_some() {
            created += 1;
        }
        created
    }
}

impl AreaTreeOperator for LayoutSplitOperator {
    fn name(&self) -> &'static str {
        "layout-split"
    }

    fn apply(&self, tree: &mut AreaTree) -> usize {
        let mut created = 0;
        for node in tree.descendants(tree.root()) {
            if tree.node(node).is_removed() || tree.is_leaf(node) {
                continue;
            }
            created += self.split(tree, node);
        }
        tree.update_grids();
        log::debug!("LayoutSplitOperator: {} areas created", created);
        created
    }
}
