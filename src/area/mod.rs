//! Visual areas and the area tree.
//!
//! An [`Area`] aggregates boxes, an [`AreaNode`] places it in the
//! [`AreaTree`], and an [`AreaGrid`] partitions a node by its children.

mod aggregate;
mod grid;
mod style;
mod tree;

pub use aggregate::{Area, Borders, TextStats};
pub use grid::AreaGrid;
pub use style::NodeStyle;
pub use tree::{AreaId, AreaNode, AreaTree, LayoutType};
