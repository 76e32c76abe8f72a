//! Area tree operators.
//!
//! Operators are passes that restructure the area tree in place. Each takes
//! exclusive ownership of the tree for the duration of [`AreaTreeOperator::apply`]
//! and leaves every grid it touched either rebuilt or stale by epoch, so
//! that later passes never read outdated geometry.

mod find_line;
mod layout_split;
mod logical_grouping;
mod reorder;
mod super_area;

pub use find_line::FindLineOperator;
pub use layout_split::LayoutSplitOperator;
pub use logical_grouping::LogicalLocalGroupingOperator;
pub use reorder::ReorderOperator;
pub use super_area::SuperAreaOperator;

use crate::area::AreaTree;

/// A restructuring pass over an area tree.
pub trait AreaTreeOperator: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Apply the pass; returns the number of changes made.
    fn apply(&self, tree: &mut AreaTree) -> usize;
}
