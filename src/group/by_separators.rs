//! Grouping between the nearest strong separators.

use crate::area::{AreaId, AreaTree};
use crate::geometry::Rect;
use crate::separator::SeparatorSet;

use super::{GroupAnalyzer, GroupSelection};

/// Selects the siblings lying between the nearest strong separators around
/// the seed.
///
/// Only separators of the strongest separator's orientation whose weight is
/// within the tolerance band below the strongest one qualify.
#[derive(Debug, Clone)]
pub struct GroupBySeparators {
    weight_tolerance: i32,
}

impl GroupBySeparators {
    /// Create the analyzer.
    pub fn new(weight_tolerance: i32) -> Self {
        Self { weight_tolerance }
    }
}

impl Default for GroupBySeparators {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GroupAnalyzer for GroupBySeparators {
    fn name(&self) -> &'static str {
        "by-separators"
    }

    fn find_super_area(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        seed: AreaId,
        separators: &SeparatorSet,
    ) -> Option<GroupSelection> {
        let pb = tree.bounds(parent);
        let sb = tree.bounds(seed);
        let qualifying = separators.qualifying(self.weight_tolerance, true);

        let region = match qualifying.first() {
            None => pb,
            Some(top) if top.is_horizontal() => {
                let y1 = qualifying
                    .iter()
                    .map(|s| s.rect())
                    .filter(|r| r.intersects_x(&sb) && r.y2 < sb.y1)
                    .map(|r| r.y2 + 1)
                    .max()
                    .unwrap_or(pb.y1);
                let y2 = qualifying
                    .iter()
                    .map(|s| s.rect())
                    .filter(|r| r.intersects_x(&sb) && r.y1 > sb.y2)
                    .map(|r| r.y1 - 1)
                    .min()
                    .unwrap_or(pb.y2);
                Rect::new(pb.x1, y1, pb.x2, y2)
            }
            Some(_) => {
                let x1 = qualifying
                    .iter()
                    .map(|s| s.rect())
                    .filter(|r| r.intersects_y(&sb) && r.x2 < sb.x1)
                    .map(|r| r.x2 + 1)
                    .max()
                    .unwrap_or(pb.x1);
                let x2 = qualifying
                    .iter()
                    .map(|s| s.rect())
                    .filter(|r| r.intersects_y(&sb) && r.x1 > sb.x2)
                    .map(|r| r.x1 - 1)
                    .min()
                    .unwrap_or(pb.x2);
                Rect::new(x1, pb.y1, x2, pb.y2)
            }
        };

        let selected: Vec<AreaId> = tree
            .children(parent)
            .iter()
            .filter(|c| region.encloses(&tree.bounds(**c)))
            .copied()
            .collect();
        log::trace!(
            "GroupBySeparators: seed {} region {} selects {}",
            seed,
            region,
            selected.len()
        );
        GroupSelection::from_areas(tree, parent, selected)
    }
}
