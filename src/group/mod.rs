//! Group analyzers: find the natural group of siblings around a seed area.
//!
//! Every analyzer selects siblings of a seed that lie in one contiguous
//! region of the parent and returns them as a [`GroupSelection`]. The super
//! area operator decides whether the selection is worth a new node; a
//! selection that covers all siblings or only the seed is never promoted.

mod by_flooding;
mod by_grouping;
mod by_separators;

pub use by_flooding::GroupByFlooding;
pub use by_grouping::GroupByGroupingAndSeparators;
pub use by_separators::GroupBySeparators;

use serde::{Deserialize, Serialize};

use crate::area::{AreaId, AreaTree};
use crate::geometry::Rect;
use crate::separator::SeparatorSet;

/// Siblings chosen to form a super area.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSelection {
    /// Union of the selected areas' bounds
    pub bounds: Rect,
    /// Selected siblings in child order
    pub selected: Vec<AreaId>,
}

impl GroupSelection {
    /// Build a selection from sibling ids; `None` when nothing was selected.
    pub fn from_areas(tree: &AreaTree, parent: AreaId, selected: Vec<AreaId>) -> Option<Self> {
        let mut ordered: Vec<AreaId> = tree
            .children(parent)
            .iter()
            .filter(|c| selected.contains(c))
            .copied()
            .collect();
        ordered.dedup();
        let bounds = ordered
            .iter()
            .map(|id| tree.bounds(*id))
            .reduce(|a, b| a.union(&b))?;
        Some(Self {
            bounds,
            selected: ordered,
        })
    }

    /// Whether the selection is worth a new node: more than one sibling and
    /// not all of them.
    pub fn is_promotable(&self, tree: &AreaTree, parent: AreaId) -> bool {
        self.selected.len() > 1 && self.selected.len() < tree.children(parent).len()
    }
}

/// A way of grouping siblings around a seed.
pub trait GroupAnalyzer: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Select the group of siblings around `seed`, a child of `parent`.
    ///
    /// `separators` must have been computed for `parent`, whose grid must
    /// be valid.
    fn find_super_area(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        seed: AreaId,
        separators: &SeparatorSet,
    ) -> Option<GroupSelection>;
}

/// Available group analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupStrategyKind {
    /// Region between the nearest strong separators
    #[default]
    BySeparators,
    /// Grid expansion stopped by strong separators
    ByGroupingAndSeparators,
    /// Flood fill over grid cells
    ByFlooding,
}

impl GroupStrategyKind {
    /// Instantiate the analyzer.
    pub fn build(&self, weight_tolerance: i32) -> Box<dyn GroupAnalyzer> {
        match self {
            GroupStrategyKind::BySeparators => Box::new(GroupBySeparators::new(weight_tolerance)),
            GroupStrategyKind::ByGroupingAndSeparators => {
                Box::new(GroupByGroupingAndSeparators::new(weight_tolerance))
            }
            GroupStrategyKind::ByFlooding => Box::new(GroupByFlooding::new(weight_tolerance)),
        }
    }
}
