//! Logical tree construction.
//!
//! The children of every area become logical nodes nested by relative
//! markedness: a less marked node following a more marked one (a paragraph
//! after a heading) becomes its child. Any other node climbs from the
//! current node towards the root while the next ancestor's markedness is
//! closer to its own than the level it has reached, and becomes a sibling
//! of the node where it stops. A large vertical gap breaks the flow and restarts at the
//! area's own node.
//!
//! [`SeparatedLogicalTree`] applies these rules as they are;
//! [`IndentationLogicalTree`] additionally refuses parents whose left edge
//! lies to the right of the child.

mod indentation;
mod separated;
mod tree;

pub use indentation::IndentationLogicalTree;
pub use separated::SeparatedLogicalTree;
pub use tree::{LogicalId, LogicalNode, LogicalTree};

use serde::{Deserialize, Serialize};

use crate::analysis::markedness_eq;
use crate::area::{AreaId, AreaTree};

/// A way of building a logical tree from an area tree.
///
/// Markedness must have been computed for the area tree.
pub trait LogicalTreeBuilder: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Build a fresh logical tree.
    fn build(&self, areas: &AreaTree) -> LogicalTree;
}

/// Decides whether two adjacent logical siblings form one unit.
pub trait NodeJoinAnalyzer {
    /// Whether `b`, following `a`, may be merged into it.
    fn is_joinable(&self, areas: &AreaTree, logical: &LogicalTree, a: LogicalId, b: LogicalId) -> bool;
}

/// Available logical tree strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalStrategyKind {
    /// Markedness only
    #[default]
    Separated,
    /// Markedness plus indentation
    Indentation,
}

impl LogicalStrategyKind {
    /// Instantiate the strategy.
    pub fn build(&self, flow_break_gap: i32, indent_tolerance: i32) -> Box<dyn LogicalTreeBuilder> {
        match self {
            LogicalStrategyKind::Separated => Box::new(SeparatedLogicalTree::new(flow_break_gap)),
            LogicalStrategyKind::Indentation => {
                Box::new(IndentationLogicalTree::new(flow_break_gap, indent_tolerance))
            }
        }
    }
}

/// Parameters of the shared placement rules.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub flow_break_gap: i32,
    pub indent_tolerance: Option<i32>,
}

/// Build a logical tree with the given placement rules.
pub(crate) fn build_with(areas: &AreaTree, placement: Placement) -> LogicalTree {
    let root_area = areas.root();
    let mut logical = LogicalTree::new(root_area);
    let root = logical.root();
    place_children(areas, &mut logical, root, root_area, placement);
    log::trace!("LogicalTree: {} nodes", logical.len());
    logical
}

fn build_node(areas: &AreaTree, logical: &mut LogicalTree, area: AreaId, placement: Placement) -> LogicalId {
    if areas.is_leaf(area) {
        return logical.push(vec![area], None);
    }
    if areas.leaves(area).len() == 1 {
        return logical.push(vec![area], Some(area));
    }
    let node = logical.push(vec![area], None);
    place_children(areas, logical, node, area, placement);
    node
}

fn place_children(
    areas: &AreaTree,
    logical: &mut LogicalTree,
    subtree_root: LogicalId,
    area: AreaId,
    placement: Placement,
) {
    let mut current: Option<LogicalId> = None;
    for child in areas.children(area).to_vec() {
        let node = build_node(areas, logical, child, placement);
        let parent = match current {
            None => subtree_root,
            Some(cur) => choose_parent(areas, logical, subtree_root, cur, node, placement),
        };
        logical.attach(parent, node);
        current = Some(node);
    }
}

fn level(areas: &AreaTree, logical: &LogicalTree, id: LogicalId) -> f64 {
    areas.node(logical.node(id).first_area()).markedness()
}

fn choose_parent(
    areas: &AreaTree,
    logical: &LogicalTree,
    subtree_root: LogicalId,
    current: LogicalId,
    node: LogicalId,
    placement: Placement,
) -> LogicalId {
    let nb = areas.bounds(logical.node(node).first_area());
    let cb = areas.bounds(logical.node(current).first_area());
    if nb.y1 - cb.y2 > placement.flow_break_gap {
        return subtree_root;
    }

    let new_level = level(areas, logical, node);
    let cur_level = level(areas, logical, current);
    let up = |id: LogicalId| logical.parent(id).unwrap_or(subtree_root);

    // descend under a markedly stronger node, otherwise climb while the
    // parent's level is closer to the new node than the level reached so far
    let mut parent = if new_level < cur_level && !markedness_eq(new_level, cur_level) {
        current
    } else {
        let mut a = current;
        loop {
            let p = up(a);
            if p == subtree_root {
                break subtree_root;
            }
            let stay = (new_level - level(areas, logical, a)).abs();
            let climb = (new_level - level(areas, logical, p)).abs();
            if stay <= climb {
                break p;
            }
            a = p;
        }
    };

    if let Some(tolerance) = placement.indent_tolerance {
        while parent != subtree_root {
            let pb = areas.bounds(logical.node(parent).first_area());
            if nb.x1 >= pb.x1 - tolerance {
                break;
            }
            parent = up(parent);
        }
    }
    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureAnalyzer;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;

    fn analyzed(spec: BoxSpec) -> AreaTree {
        let mut areas = AreaTree::from_spec(spec).unwrap();
        FeatureAnalyzer::default().analyze(&mut areas);
        areas
    }

    fn document() -> BoxSpec {
        BoxSpec::viewport(400, 400)
            .with_child(BoxSpec::text("Chapter", Rect::new(10, 10, 200, 34)).with_font_size(24.0).bold())
            .with_child(BoxSpec::text("First paragraph", Rect::new(10, 40, 380, 52)))
            .with_child(BoxSpec::text("Second paragraph", Rect::new(10, 56, 380, 68)))
            .with_child(BoxSpec::text("Next chapter", Rect::new(10, 74, 200, 98)).with_font_size(24.0).bold())
            .with_child(BoxSpec::text("Third paragraph", Rect::new(10, 104, 380, 116)))
    }

    #[test]
    fn test_paragraphs_nest_under_headings() {
        let areas = analyzed(document());
        let logical = build_with(
            &areas,
            Placement {
                flow_break_gap: 10,
                indent_tolerance: None,
            },
        );
        let top = logical.children(logical.root()).to_vec();
        assert_eq!(top.len(), 2);
        assert_eq!(logical.children(top[0]).len(), 2);
        assert_eq!(logical.children(top[1]).len(), 1);
        assert_eq!(logical.own_text(&areas, top[1]), "Next chapter");
    }

    #[test]
    fn test_climbs_to_the_closer_level() {
        let spec = BoxSpec::viewport(400, 400)
            .with_child(BoxSpec::text("Part", Rect::new(10, 10, 200, 20)))
            .with_child(BoxSpec::text("Body", Rect::new(10, 24, 200, 34)))
            .with_child(BoxSpec::text("Chapter", Rect::new(10, 38, 200, 48)));
        let mut areas = AreaTree::from_spec(spec).unwrap();
        let kids = areas.children(areas.root()).to_vec();
        for (id, value) in kids.iter().zip([10.0, 2.0, 8.0]) {
            areas.fix_markedness(*id, value);
        }
        let logical = build_with(
            &areas,
            Placement {
                flow_break_gap: 10,
                indent_tolerance: None,
            },
        );
        let top = logical.children(logical.root()).to_vec();
        assert_eq!(top.len(), 2);
        assert_eq!(logical.own_text(&areas, top[0]), "Part");
        assert_eq!(logical.own_text(&areas, top[1]), "Chapter");
        assert_eq!(logical.children(top[0]).len(), 1);
    }

    #[test]
    fn test_flow_break_restarts_at_root() {
        let spec = BoxSpec::viewport(400, 400)
            .with_child(BoxSpec::text("Heading", Rect::new(10, 10, 200, 34)).with_font_size(24.0))
            .with_child(BoxSpec::text("Far away text", Rect::new(10, 200, 380, 212)));
        let areas = analyzed(spec);
        let logical = build_with(
            &areas,
            Placement {
                flow_break_gap: 10,
                indent_tolerance: None,
            },
        );
        assert_eq!(logical.children(logical.root()).len(), 2);
    }

    #[test]
    fn test_single_leaf_subtree_collapses() {
        let spec = BoxSpec::viewport(400, 400).with_child(
            BoxSpec::container(Rect::new(0, 0, 300, 100))
                .with_background(crate::geometry::Color::rgb(230, 230, 230))
                .with_child(BoxSpec::text("Boxed", Rect::new(10, 10, 100, 20))),
        );
        let areas = analyzed(spec);
        let logical = SeparatedLogicalTree::new(10).build(&areas);
        let top = logical.children(logical.root()).to_vec();
        assert_eq!(top.len(), 1);
        let node = logical.node(top[0]);
        assert!(node.is_leaf());
        assert!(node.content_tree().is_some());
        assert_eq!(logical.own_text(&areas, top[0]), "Boxed");
    }
}
