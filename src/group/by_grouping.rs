//! Grouping by growing the seed's grid span until separators stop it.

use crate::area::{AreaGrid, AreaId, AreaTree};
use crate::geometry::Rect;
use crate::separator::SeparatorSet;

use super::{GroupAnalyzer, GroupSelection};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

const DIRECTIONS: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

/// Grows the seed's grid span one grid line at a time in all four
/// directions.
///
/// A step is refused when a strong separator intersects the grown span.
/// Siblings cut by the new edge pull the span further out (jagged edges are
/// aligned), for at most as many rounds as the grid has lines.
#[derive(Debug, Clone)]
pub struct GroupByGroupingAndSeparators {
    weight_tolerance: i32,
}

impl GroupByGroupingAndSeparators {
    /// Create the analyzer.
    pub fn new(weight_tolerance: i32) -> Self {
        Self { weight_tolerance }
    }
}

impl Default for GroupByGroupingAndSeparators {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GroupAnalyzer for GroupByGroupingAndSeparators {
    fn name(&self) -> &'static str {
        "by-grouping"
    }

    fn find_super_area(
        &self,
        tree: &AreaTree,
        parent: AreaId,
        seed: AreaId,
        separators: &SeparatorSet,
    ) -> Option<GroupSelection> {
        let grid = tree.grid(parent);
        let mut span = grid.position(seed)?;
        let blocking: Vec<Rect> = separators
            .qualifying(self.weight_tolerance, false)
            .iter()
            .map(|s| s.rect())
            .collect();
        let blocked = |span: &Rect| {
            let abs = grid.span_bounds(span);
            blocking.iter().any(|s| s.intersects(&abs))
        };
        let max_rounds = grid.width() + grid.height();

        let mut grew = true;
        while grew {
            grew = false;
            for dir in DIRECTIONS {
                let Some(step) = extend(grid, &span, dir) else {
                    continue;
                };
                let Some(candidate) = align(grid, step, max_rounds) else {
                    continue;
                };
                if blocked(&candidate) {
                    continue;
                }
                span = candidate;
                grew = true;
            }
        }

        let selected = grid.children_in(&span);
        log::trace!(
            "GroupByGrouping: seed {} grew to grid span {} with {} siblings",
            seed,
            span,
            selected.len()
        );
        GroupSelection::from_areas(tree, parent, selected)
    }
}

/// The span grown by one grid line, or `None` at the grid border.
fn extend(grid: &AreaGrid, span: &Rect, dir: Direction) -> Option<Rect> {
    let mut out = *span;
    match dir {
        Direction::Left if span.x1 > 0 => out.x1 -= 1,
        Direction::Right if (span.x2 as usize) + 1 < grid.width() => out.x2 += 1,
        Direction::Up if span.y1 > 0 => out.y1 -= 1,
        Direction::Down if (span.y2 as usize) + 1 < grid.height() => out.y2 += 1,
        _ => return None,
    }
    Some(out)
}

/// Grow `span` until no sibling sticks out of it.
fn align(grid: &AreaGrid, mut span: Rect, max_rounds: usize) -> Option<Rect> {
    for _ in 0..=max_rounds {
        let mut grown = span;
        for child in grid.children_touching(&span) {
            if let Some(pos) = grid.position(child) {
                grown.expand_to_enclose(&pos);
            }
        }
        if grown == span {
            return Some(span);
        }
        span = grown;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;
    use crate::separator::{ColumnSeparators, SeparatorStrategy};

    #[test]
    fn test_column_grouping() {
        let page = BoxSpec::viewport(300, 200)
            .with_child(BoxSpec::text("L1", Rect::new(10, 10, 120, 20)))
            .with_child(BoxSpec::text("R1", Rect::new(180, 10, 290, 20)))
            .with_child(BoxSpec::text("L2", Rect::new(10, 24, 120, 34)))
            .with_child(BoxSpec::text("R2", Rect::new(180, 24, 290, 34)));
        let tree = AreaTree::from_spec(page).unwrap();
        let root = tree.root();
        let seps = ColumnSeparators::default().find(&tree, root, None);
        assert!(!seps.vertical().is_empty());
        let kids = tree.children(root).to_vec();
        let sel = GroupByGroupingAndSeparators::default()
            .find_super_area(&tree, root, kids[0], &seps)
            .unwrap();
        assert_eq!(sel.selected, vec![kids[0], kids[2]]);
    }
}
