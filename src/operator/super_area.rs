//! Creation of super areas around natural groups of siblings.

use std::collections::HashSet;

use crate::area::{AreaId, AreaTree};
use crate::group::{GroupAnalyzer, GroupBySeparators};
use crate::separator::{ColumnSeparators, SeparatorStrategy};

use super::AreaTreeOperator;

/// Groups siblings into synthetic super areas.
///
/// Within every node the leaf children are taken as seeds one by one. The
/// group analyzer selects the siblings around a seed; a selection of more
/// than one but not all siblings is wrapped into a new area, which is then
/// processed the same way with one pass less of budget. Seeds that cannot
/// be grouped are skipped for the rest of the pass.
pub struct SuperAreaOperator {
    separators: Box<dyn SeparatorStrategy>,
    grouping: Box<dyn GroupAnalyzer>,
    depth: usize,
}

impl SuperAreaOperator {
    /// Create the operator with a separator strategy, a group analyzer and
    /// the number of nested passes.
    pub fn new(separators: Box<dyn SeparatorStrategy>, grouping: Box<dyn GroupAnalyzer>, depth: usize) -> Self {
        Self {
            separators,
            grouping,
            depth,
        }
    }

    fn group_children(&self, tree: &mut AreaTree, node: AreaId, budget: usize, created: &mut HashSet<AreaId>) -> usize {
        if budget == 0 {
            return 0;
        }
        let mut count = 0;
        let mut seeds: Vec<AreaId> = tree
            .children(node)
            .iter()
            .filter(|c| tree.is_leaf(**c))
            .copied()
            .collect();

        while !seeds.is_empty() {
            let seed = seeds.remove(0);
            if tree.parent(seed) != Some(node) {
                continue;
            }
            tree.ensure_grid(node);
            let separators = self.separators.find(tree, node, None);
            let Some(selection) = self.grouping.find_super_area(tree, node, seed, &separators) else {
                continue;
            };
            if !selection.is_promotable(tree, node) {
                continue;
            }
            let Some(group) = tree.create_super_area(node, &selection.selected) else {
                continue;
            };
            log::trace!(
                "SuperAreaOperator: {} groups {} areas of {} ({})",
                group,
                selection.selected.len(),
                node,
                self.grouping.name()
            );
            created.insert(group);
            seeds.retain(|s| !selection.selected.contains(s));
            count += 1;
            tree.ensure_grid(group);
            count += self.group_children(tree, group, budget - 1, created);
        }
        count
    }
}

impl Default for SuperAreaOperator {
    fn default() -> Self {
        Self::new(Box::new(ColumnSeparators::default()), Box::new(GroupBySeparators::default()), 2)
    }
}

impl AreaTreeOperator for SuperAreaOperator {
    fn name(&self) -> &'static str {
        "super-area"
    }

    fn apply(&self, tree: &mut AreaTree) -> usize {
        tree.update_grids();
        let mut created = HashSet::new();
        let mut total = 0;
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            total += self.group_children(tree, node, self.depth, &mut created);
            stack.extend(
                tree.children(node)
                    .iter()
                    .filter(|c| !tree.is_leaf(**c) && !created.contains(*c))
                    .copied(),
            );
        }
        tree.update_grids();
        log::debug!(
            "SuperAreaOperator: {} super areas ({}, {})",
            total,
            self.separators.name(),
            self.grouping.name()
        );
        total
    }
}
