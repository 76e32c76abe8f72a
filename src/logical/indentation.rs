use crate::area::AreaTree;

use super::{build_with, LogicalTree, LogicalTreeBuilder, Placement};

/// Logical tree nested by markedness, constrained by indentation.
///
/// A node is never placed under a parent that starts more than
/// `indent_tolerance` pixels to its right; it climbs instead.
#[derive(Debug, Clone)]
pub struct IndentationLogicalTree {
    flow_break_gap: i32,
    indent_tolerance: i32,
}

impl IndentationLogicalTree {
    /// Create the builder; a child may start at most `indent_tolerance`
    /// pixels left of its parent.
    pub fn new(flow_break_gap: i32, indent_tolerance: i32) -> Self {
        Self {
            flow_break_gap,
            indent_tolerance,
        }
    }
}

impl Default for IndentationLogicalTree {
    fn default() -> Self {
        Self::new(10, 2)
    }
}

impl LogicalTreeBuilder for IndentationLogicalTree {
    fn name(&self) -> &'static str {
        "indentation"
    }

    fn build(&self, areas: &AreaTree) -> LogicalTree {
        build_with(
            areas,
            Placement {
                flow_break_gap: self.flow_break_gap,
                indent_tolerance: Some(self.indent_tolerance),
            },
        )
    }
}
