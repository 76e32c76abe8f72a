//! Grouping by flood fill over the grid.

use std::collections::{HashSet, VecDeque};

use crate::area::{AreaGrid, AreaId, AreaTree};
use crate::geometry::Rect;
use crate::separator::SeparatorSet;

use super::{GroupAnalyzer, GroupSelection};

/// Flood fills grid cells from the seed.
///
/// Moving into a neighbouring cell is blocked when a strong separator covers
/// the midpoint of that cell's facing edge. The siblings enclosed by the
/// bounding box of the flooded cells form the group.
#[derive(Debug, Clone)]
pub struct GroupByFlooding {
    weight_tolerance: i32,
}

impl GroupByFlooding {
    /// Create the analyzer.
    pub fn new(weight_tolerance: i32) -> Self {
        Self { weight_tolerance }
    }
}

impl Default for GroupByFlooding {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GroupAnalyzer for GroupByFlooding {
    fn name(&self) -> &'static str {
        "by-flooding"
    }

    fn find_super_area(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        seed: AreaId,
        separators: &SeparatorSet,
    ) -> Option<GroupSelection> {
        let grid = tree.grid(parent);
        let start = grid.position(seed)?;
        let blocking: Vec<Rect> = separators
            .qualifying(self.weight_tolerance, false)
            .iter()
            .map(|s| s.rect())
            .collect();
        let is_blocked = |x: i32, y: i32| blocking.iter().any(|s| s.contains(x, y));

        let mut visited: HashSet<(usize, usize)> = HashSet::new();
        let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
        for row in start.y1..=start.y2 {
            for col in start.x1..=start.x2 {
                let cell = (col as usize, row as usize);
                visited.insert(cell);
                queue.push_back(cell);
            }
        }

        while let Some((col, row)) = queue.pop_front() {
            for (next, edge) in neighbours(grid, col, row) {
                if visited.contains(&next) || is_blocked(edge.0, edge.1) {
                    continue;
                }
                visited.insert(next);
                queue.push_back(next);
            }
        }

        let mut span = start;
        for (col, row) in &visited {
            span.expand_to_enclose(&Rect::new(*col as i32, *row as i32, *col as i32, *row as i32));
        }
        let selected = grid.children_in(&span);
        log::trace!(
            "GroupByFlooding: seed {} flooded {} cells, span {}",
            seed,
            visited.len(),
            span
        );
        GroupSelection::from_areas(tree, parent, selected)
    }
}

/// Neighbouring cells with the midpoint of the edge facing the current cell.
fn neighbours(grid: &AreaGrid, col: usize, row: usize) -> Vec<((usize, usize), (i32, i32))> {
    let mid_y = grid.row_y(row) + grid.row_height(row) / 2;
    let mid_x = grid.column_x(col) + grid.column_width(col) / 2;
    let mut out = Vec::with_capacity(4);
    if col > 0 {
        out.push(((col - 1, row), (grid.column_x(col) - 1, mid_y)));
    }
    if col + 1 < grid.width() {
        out.push(((col + 1, row), (grid.column_x(col + 1), mid_y)));
    }
    if row > 0 {
        out.push(((col, row - 1), (mid_x, grid.row_y(row) - 1)));
    }
    if row + 1 < grid.height() {
        out.push(((col, row + 1), (mid_x, grid.row_y(row + 1))));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::separator::{ColumnSeparators, SeparatorStrategy};

    #[test]
    fn test_flood_stops_at_column_gap() {
        let page = BoxSpec::viewport(300, 200)
            .with_child(BoxSpec::text("L1", Rect::new(10, 10, 120, 20)))
            .with_child(BoxSpec::text("R1", Rect::new(180, 10, 290, 20)))
            .with_child(BoxSpec::text("L2", Rect::new(10, 24, 120, 34)))
            .with_child(BoxSpec::text("R2", Rect::new(180, 24, 290, 34)));
        let tree = AreaTree::from_spec(page).unwrap();
        let root = tree.root();
        let seps = ColumnSeparators::default().find(&tree, root, None);
        let kids = tree.children(root).to_vec();
        let sel = GroupByFlooding::default()
            .find_super_area(&tree, root, kids[1], &seps)
            .unwrap();
        assert_eq!(sel.selected, vec![kids[1], kids[3]]);
    }

    #[test]
    fn test_flood_without_separators_reaches_everything() {
        let page = BoxSpec::viewport(100, 100)
            .with_child(BoxSpec::text("a", Rect::new(0, 0, 40, 10)))
            .with_child(BoxSpec::text("b", Rect::new(50, 0, 90, 10)));
        let tree = AreaTree::from_spec(page).unwrap();
        let root = tree.root();
        let seps = SeparatorSet::empty(&tree, root);
        let seed = tree.children(root)[0];
        let sel = GroupByFlooding::default()
            .find_super_area(&tree, root, seed, &seps)
            .unwrap();
        assert!(!sel.is_promotable(&tree, root));
        assert_eq!(sel.selected.len(), 2);
    }
}
