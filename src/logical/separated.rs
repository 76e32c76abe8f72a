use crate::area::AreaTree;

use super::{build_with, LogicalTree, LogicalTreeBuilder, Placement};

/// Logical tree nested by markedness alone.
#[derive(Debug, Clone)]
pub struct SeparatedLogicalTree {
    flow_break_gap: i32,
}

impl SeparatedLogicalTree {
    /// Create the builder; vertical gaps above `flow_break_gap` pixels
    /// restart the nesting.
    pub fn new(flow_break_gap: i32) -> Self {
        Self { flow_break_gap }
    }
}

impl Default for SeparatedLogicalTree {
    fn default() -> Self {
        Self::new(10)
    }
}

impl LogicalTreeBuilder for SeparatedLogicalTree {
    fn name(&self) -> &'static str {
        "separated"
    }

    fn build(&self, areas: &AreaTree) -> LogicalTree {
        build_with(
            areas,
            Placement {
                flow_break_gap: self.flow_break_gap,
                indent_tolerance: None,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureAnalyzer;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    #[test]
    fn test_every_area_is_represented() {
        let mut areas = AreaTree::from_spec(
            BoxSpec::viewport(300, 200)
                .with_child(BoxSpec::text("Title", Rect::new(10, 10, 120, 30)).with_font_size(20.0))
                .with_child(BoxSpec::text("Body one", Rect::new(10, 36, 280, 46)))
                .with_child(BoxSpec::text("Body two", Rect::new(10, 50, 280, 60))),
        )
        .unwrap();
        FeatureAnalyzer::default().analyze(&mut areas);
        let logical = SeparatedLogicalTree::default().build(&areas);
        for kid in areas.children(areas.root()) {
            assert!(logical.find_by_area(*kid).is_some());
        }
        assert_eq!(logical.len(), 4);
    }
}
