//! Separators from runs of empty grid cells.

use std::ops::RangeInclusive;

use crate::area::{AreaId, AreaTree};
use crate::geometry::Rect;

use super::{finish, region, SeparatorOptions, SeparatorSet, SeparatorStrategy};

/// Finds runs of empty grid cells.
///
/// Every grid column is scanned for maximal vertical runs of empty cells,
/// and runs covering the same rows in consecutive columns are merged into
/// one band. The rows are scanned the same way, so a gap that is empty over
/// the whole width is found even where a column gap crosses it. Each band is
/// then classified by its aspect ratio: wider than tall is horizontal,
/// otherwise vertical. Overlapping bands are merged or dropped by the shared
/// post-processing. Cells covered only by rule areas count as empty; the
/// rules themselves are reported as box separators.
#[derive(Debug, Clone, Default)]
pub struct GridSeparators {
    options: SeparatorOptions,
}

impl GridSeparators {
    /// Create the strategy.
    pub fn new(options: SeparatorOptions) -> Self {
        Self { options }
    }
}

impl SeparatorStrategy for GridSeparators {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn find(&self, tree: &AreaTree, node: AreaId, filter: Option<Rect>) -> SeparatorSet {
        let region = region(tree, node, filter);
        if region.is_empty() || tree.is_leaf(node) {
            return finish(tree, node, region, Vec::new(), Vec::new(), &self.options);
        }
        let grid = tree.grid(node);

        let c1 = grid.column_index(region.x1);
        let c2 = grid.column_index(region.x2);
        let r1 = grid.row_index(region.y1);
        let r2 = grid.row_index(region.y2);

        let empty = |col: usize, row: usize| match grid.cell(col, row) {
            None => true,
            Some(child) => tree.area(child).is_rule(),
        };

        let mut bands: Vec<Rect> = merged_runs(c1..=c2, r1..=r2, |col, row| empty(col, row))
            .into_iter()
            .map(|run| Rect::new(run.first as i32, run.start as i32, run.last as i32, run.end as i32))
            .collect();
        bands.extend(
            merged_runs(r1..=r2, c1..=c2, |row, col| empty(col, row))
                .into_iter()
                .map(|run| Rect::new(run.start as i32, run.first as i32, run.end as i32, run.last as i32)),
        );

        let mut horizontal = Vec::new();
        let mut vertical = Vec::new();
        for band in bands {
            let rect = grid.span_bounds(&band).intersection(&region);
            if rect.is_empty() {
                continue;
            }
            if rect.width() >= rect.height() {
                horizontal.push(rect);
            } else {
                vertical.push(rect);
            }
        }
        log::trace!(
            "GridSeparators: area {}: {} raw horizontal, {} raw vertical",
            node,
            horizontal.len(),
            vertical.len()
        );
        finish(tree, node, region, horizontal, vertical, &self.options)
    }
}

/// A run of empty cells `start..=end` along a line, repeated on the lines
/// `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: usize,
    end: usize,
    first: usize,
    last: usize,
}

/// Maximal runs of empty cells along each line of `lines`, merged across
/// consecutive lines that have a run over exactly the same cells.
fn merged_runs(
    lines: RangeInclusive<usize>,
    cells: RangeInclusive<usize>,
    empty: impl Fn(usize, usize) -> bool,
) -> Vec<Run> {
    let mut done = Vec::new();
    let mut open: Vec<Run> = Vec::new();
    for line in lines {
        let mut next = Vec::new();
        let mut start: Option<usize> = None;
        for cell in cells.clone() {
            match (empty(line, cell), start) {
                (true, None) => start = Some(cell),
                (false, Some(s)) => {
                    next.push((s, cell - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            next.push((s, *cells.end()));
        }

        let mut widened = Vec::with_capacity(next.len());
        for (start, end) in next {
            match open.iter().position(|r| r.start == start && r.end == end) {
                Some(i) => {
                    let mut run = open.swap_remove(i);
                    run.last = line;
                    widened.push(run);
                }
                None => widened.push(Run {
                    start,
                    end,
                    first: line,
                    last: line,
                }),
            }
        }
        done.append(&mut open);
        open = widened;
    }
    done.append(&mut open);
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxSpec;

    #[test]
    fn test_two_columns() {
        let page = BoxSpec::viewport(300, 200)
            .with_child(BoxSpec::text("Left column text", Rect::new(10, 10, 120, 180)))
            .with_child(BoxSpec::text("Right column text", Rect::new(180, 10, 290, 180)));
        let tree = AreaTree::from_spec(page).unwrap();
        let seps = GridSeparators::default().find(&tree, tree.root(), None);
        assert_eq!(seps.vertical().len(), 1);
        let v = seps.vertical()[0].rect();
        assert_eq!((v.x1, v.x2), (121, 179));
        assert!(seps.horizontal().is_empty());
    }

    #[test]
    fn test_columns_below_full_width_header() {
        let page = BoxSpec::viewport(300, 300)
            .with_child(BoxSpec::text("Programme", Rect::new(10, 10, 290, 40)))
            .with_child(BoxSpec::text("Left column text", Rect::new(10, 60, 130, 290)))
            .with_child(BoxSpec::text("Right column text", Rect::new(170, 60, 290, 290)));
        let tree = AreaTree::from_spec(page).unwrap();
        let seps = GridSeparators::default().find(&tree, tree.root(), None);
        assert_eq!(seps.horizontal().len(), 1);
        let h = seps.horizontal()[0].rect();
        assert_eq!((h.y1, h.y2), (41, 59));
        assert_eq!(seps.vertical().len(), 1);
        let v = seps.vertical()[0].rect();
        assert_eq!((v.x1, v.x2), (131, 169));
        assert!(v.y1 <= 60 && v.y2 >= 290);
    }

    #[test]
    fn test_merged_runs() {
        // 3 lines of 4 cells, cell 1 empty everywhere, cell 3 only on line 0
        let empty = |line: usize, cell: usize| cell == 1 || (cell == 3 && line == 0);
        let mut runs = merged_runs(0..=2, 0..=3, empty);
        runs.sort_by_key(|r| (r.start, r.first));
        assert_eq!(
            runs,
            vec![
                Run { start: 1, end: 1, first: 0, last: 2 },
                Run { start: 3, end: 3, first: 0, last: 0 },
            ]
        );
    }

    #[test]
    fn test_leaf_has_no_separators() {
        let page = BoxSpec::viewport(100, 100).with_child(BoxSpec::text("Only", Rect::new(0, 0, 50, 10)));
        let tree = AreaTree::from_spec(page).unwrap();
        let leaf = tree.children(tree.root())[0];
        assert!(GridSeparators::default().find(&tree, leaf, None).is_empty());
    }
}
