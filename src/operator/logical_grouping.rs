//! Promotion of logical sections into area nodes.

use crate::area::{AreaId, AreaTree, LayoutType};
use crate::logical::{LogicalId, LogicalTree};

/// Turns logical sections (a node followed by its logical children) into
/// super areas.
///
/// For a logical node whose areas and whose children's areas are
/// consecutive siblings of one normal-flow area node, the longest run
/// starting at the node that is stacked vertically (with at most
/// `garbage_limit` consecutive exceptions) is wrapped into a new area, and
/// the logical node is wrapped into a new logical node for that area.
#[derive(Debug, Clone)]
pub struct LogicalLocalGroupingOperator {
    garbage_limit: usize,
}

impl LogicalLocalGroupingOperator {
    /// Create the operator; up to `garbage_limit` consecutive unstacked
    /// nodes may interrupt a run.
    pub fn new(garbage_limit: usize) -> Self {
        Self { garbage_limit }
    }

    /// Apply to an area tree and the logical tree built from it.
    ///
    /// Returns the number of sections promoted.
    pub fn apply(&self, areas: &mut AreaTree, logical: &mut LogicalTree) -> usize {
        let root = logical.root();
        let mut order = logical.descendants(root);
        order.reverse();
        let mut promoted = 0;
        for id in order {
            if id == root || logical.children(id).is_empty() {
                continue;
            }
            let Some((parent, run)) = self.section_run(areas, logical, id) else {
                continue;
            };
            let Some(group) = areas.create_super_area(parent, &run) else {
                continue;
            };
            log::trace!(
                "LogicalLocalGroupingOperator: section of {} areas as {} in {}",
                run.len(),
                group,
                parent
            );
            logical.wrap(id, group);
            promoted += 1;
        }
        areas.update_grids();
        log::debug!("LogicalLocalGroupingOperator: {} sections promoted", promoted);
        promoted
    }

    /// The area parent and the run of its children forming the section of
    /// logical node `id`.
    fn section_run(&self, areas: &AreaTree, logical: &LogicalTree, id: LogicalId) -> Option<(AreaId, Vec<AreaId>)> {
        let head = logical.node(id).first_area();
        let parent = areas.parent(head)?;
        if areas.node(parent).layout() != LayoutType::Normal {
            return None;
        }

        let mut members: Vec<AreaId> = Vec::new();
        let sources = logical
            .areas(id)
            .iter()
            .chain(logical.children(id).iter().flat_map(|c| logical.areas(*c)));
        for area in sources {
            let member = child_under(areas, parent, *area)?;
            if !members.contains(&member) {
                members.push(member);
            }
        }
        let mut indexed: Vec<(usize, AreaId)> = members
            .into_iter()
            .filter_map(|m| areas.child_index(m).map(|i| (i, m)))
            .collect();
        indexed.sort_unstable();

        let head_member = child_under(areas, parent, head)?;
        let first = indexed.iter().position(|(_, m)| *m == head_member)?;
        let mut run = vec![indexed[first]];
        let mut bad = 0;
        for next in &indexed[first + 1..] {
            let last = run[run.len() - 1];
            if next.0 != last.0 + 1 {
                break;
            }
            if areas.bounds(next.1).y1 > areas.bounds(last.1).y2 {
                bad = 0;
            } else {
                bad += 1;
                if bad > self.garbage_limit {
                    break;
                }
            }
            run.push(*next);
        }
        // trailing exceptions do not belong to the section
        while bad > 0 && run.len() > 1 {
            run.pop();
            bad -= 1;
        }

        if run.len() < 2 || run.len() >= areas.children(parent).len() {
            return None;
        }
        Some((parent, run.into_iter().map(|(_, m)| m).collect()))
    }
}

impl Default for LogicalLocalGroupingOperator {
    fn default() -> Self {
        Self::new(1)
    }
}

/// The ancestor of `area` (or `area` itself) that is a child of `parent`.
fn child_under(areas: &AreaTree, parent: AreaId, area: AreaId) -> Option<AreaId> {
    let mut cur = area;
    loop {
        let p = areas.parent(cur)?;
        if p == parent {
            return Some(cur);
        }
        cur = p;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureAnalyzer;
    use crate::boxes::BoxSpec;
    use crate::geometry::Rect;
    use crate::logical::{LogicalTreeBuilder, SeparatedLogicalTree};

    fn two_sections() -> AreaTree {
        let mut areas = AreaTree::from_spec(
            BoxSpec::viewport(400, 400)
                .with_child(BoxSpec::text("Chapter", Rect::new(10, 10, 200, 34)).with_font_size(24.0).bold())
                .with_child(BoxSpec::text("First paragraph", Rect::new(10, 40, 380, 52)))
                .with_child(BoxSpec::text("Second paragraph", Rect::new(10, 56, 380, 68)))
                .with_child(BoxSpec::text("Next chapter", Rect::new(10, 74, 200, 98)).with_font_size(24.0).bold())
                .with_child(BoxSpec::text("Third paragraph", Rect::new(10, 104, 380, 116))),
        )
        .unwrap();
        FeatureAnalyzer::default().analyze(&mut areas);
        areas
    }

    #[test]
    fn test_sections_become_areas() {
        let mut areas = two_sections();
        let mut logical = SeparatedLogicalTree::default().build(&areas);
        let promoted = LogicalLocalGroupingOperator::default().apply(&mut areas, &mut logical);
        assert_eq!(promoted, 2);
        let kids = areas.children(areas.root()).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(areas.text(kids[0]), "Chapter First paragraph Second paragraph");
        assert_eq!(areas.text(kids[1]), "Next chapter Third paragraph");
        let top = logical.children(logical.root()).to_vec();
        assert_eq!(logical.areas(top[0]), &[kids[0]]);
    }

    #[test]
    fn test_single_section_covering_everything_is_skipped() {
        let mut areas = AreaTree::from_spec(
            BoxSpec::viewport(400, 200)
                .with_child(BoxSpec::text("Title", Rect::new(10, 10, 200, 34)).with_font_size(24.0))
                .with_child(BoxSpec::text("Only paragraph", Rect::new(10, 40, 380, 52))),
        )
        .unwrap();
        FeatureAnalyzer::default().analyze(&mut areas);
        let mut logical = SeparatedLogicalTree::default().build(&areas);
        assert_eq!(LogicalLocalGroupingOperator::default().apply(&mut areas, &mut logical), 0);
    }
}
