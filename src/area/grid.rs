//! Row/column partition of an area induced by its children.

use crate::geometry::Rect;

use super::AreaId;

/// Slab decomposition of a node's rectangle.
///
/// Column boundaries are the `x1` and `x2 + 1` coordinates of every child,
/// clamped to the node; rows are built the same way from `y`. Each child
/// occupies a contiguous span of cells, its grid position. When children
/// overlap, a cell belongs to the first child in child order.
///
/// A grid is tagged with the epoch of the node it was built for. Queries go
/// through [`super::AreaTree::grid`], which refuses grids from an older epoch.
#[derive(Debug, Clone)]
pub struct AreaGrid {
    epoch: u64,
    bounds: Rect,
    xs: Vec<i32>,
    ys: Vec<i32>,
    cells: Vec<Option<AreaId>>,
    positions: Vec<(AreaId, Rect)>,
}

impl AreaGrid {
    /// Build the grid of `bounds` for the given children and their bounds.
    pub(crate) fn build(epoch: u64, bounds: Rect, children: &[(AreaId, Rect)]) -> Self {
        let xs = boundaries(
            bounds.x1,
            bounds.x2 + 1,
            children.iter().flat_map(|(_, r)| [r.x1, r.x2 + 1]),
        );
        let ys = boundaries(
            bounds.y1,
            bounds.y2 + 1,
            children.iter().flat_map(|(_, r)| [r.y1, r.y2 + 1]),
        );

        let width = xs.len() - 1;
        let height = ys.len() - 1;
        let mut grid = Self {
            epoch,
            bounds,
            xs,
            ys,
            cells: vec![None; width * height],
            positions: Vec::with_capacity(children.len()),
        };

        for (id, rect) in children {
            let clipped = rect.intersection(&bounds);
            if clipped.is_empty() {
                grid.positions.push((*id, Rect::new(0, 0, -1, -1)));
                continue;
            }
            let gx1 = grid.column_index(clipped.x1);
            let gx2 = grid.column_index(clipped.x2);
            let gy1 = grid.row_index(clipped.y1);
            let gy2 = grid.row_index(clipped.y2);
            let pos = Rect::new(gx1 as i32, gy1 as i32, gx2 as i32, gy2 as i32);
            for y in gy1..=gy2 {
                for x in gx1..=gx2 {
                    let cell = &mut grid.cells[y * width + x];
                    if cell.is_none() {
                        *cell = Some(*id);
                    }
                }
            }
            grid.positions.push((*id, pos));
        }
        grid
    }

    /// Epoch of the node when the grid was built.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Absolute bounds covered by the grid.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.xs.len() - 1
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.ys.len() - 1
    }

    /// Width of a column in pixels.
    pub fn column_width(&self, col: usize) -> i32 {
        self.check_column(col);
        self.xs[col + 1] - self.xs[col]
    }

    /// Height of a row in pixels.
    pub fn row_height(&self, row: usize) -> i32 {
        self.check_row(row);
        self.ys[row + 1] - self.ys[row]
    }

    /// Absolute x coordinate where a column starts.
    pub fn column_x(&self, col: usize) -> i32 {
        assert!(col <= self.width(), "grid column {} out of range", col);
        self.xs[col]
    }

    /// Absolute y coordinate where a row starts.
    pub fn row_y(&self, row: usize) -> i32 {
        assert!(row <= self.height(), "grid row {} out of range", row);
        self.ys[row]
    }

    /// The child occupying a cell.
    pub fn cell(&self, col: usize, row: usize) -> Option<AreaId> {
        self.check_column(col);
        self.check_row(row);
        self.cells[row * self.width() + col]
    }

    /// Absolute rectangle of a span of cells given in grid coordinates.
    pub fn span_bounds(&self, span: &Rect) -> Rect {
        let (x1, y1, x2, y2) = (span.x1 as usize, span.y1 as usize, span.x2 as usize, span.y2 as usize);
        self.check_column(x2);
        self.check_row(y2);
        Rect::new(self.xs[x1], self.ys[y1], self.xs[x2 + 1] - 1, self.ys[y2 + 1] - 1)
    }

    /// Absolute rectangle of one cell.
    pub fn cell_bounds(&self, col: usize, row: usize) -> Rect {
        self.span_bounds(&Rect::new(col as i32, row as i32, col as i32, row as i32))
    }

    /// Grid position of a child, if it is part of the grid.
    pub fn position(&self, child: AreaId) -> Option<Rect> {
        self.positions
            .iter()
            .find(|(id, _)| *id == child)
            .map(|(_, r)| *r)
            .filter(|r| !r.is_empty())
    }

    /// Grid positions of all children in child order.
    pub fn positions(&self) -> &[(AreaId, Rect)] {
        &self.positions
    }

    /// Children whose grid position lies inside `span`.
    pub fn children_in(&self, span: &Rect) -> Vec<AreaId> {
        self.positions
            .iter()
            .filter(|(_, r)| !r.is_empty() && span.encloses(r))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Children whose grid position intersects `span`.
    pub fn children_touching(&self, span: &Rect) -> Vec<AreaId> {
        self.positions
            .iter()
            .filter(|(_, r)| !r.is_empty() && span.intersects(r))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Index of the column containing absolute `x`.
    pub fn column_index(&self, x: i32) -> usize {
        find_slab(&self.xs, x)
    }

    /// Index of the row containing absolute `y`.
    pub fn row_index(&self, y: i32) -> usize {
        find_slab(&self.ys, y)
    }

    fn check_column(&self, col: usize) {
        assert!(
            col < self.width(),
            "grid column {} out of range (width {}); stale grid?",
            col,
            self.width()
        );
    }

    fn check_row(&self, row: usize) {
        assert!(
            row < self.height(),
            "grid row {} out of range (height {}); stale grid?",
            row,
            self.height()
        );
    }
}

fn boundaries(start: i32, end: i32, points: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut out: Vec<i32> = points.map(|p| p.clamp(start, end)).collect();
    out.push(start);
    out.push(end);
    out.sort_unstable();
    out.dedup();
    out
}

fn find_slab(bounds: &[i32], v: i32) -> usize {
    match bounds.binary_search(&v) {
        Ok(i) => i.min(bounds.len() - 2),
        Err(0) => 0,
        Err(i) => (i - 1).min(bounds.len() - 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> AreaId {
        AreaId(i)
    }

    #[test]
    fn test_grid_partition() {
        let bounds = Rect::new(0, 0, 99, 49);
        let children = vec![
            (id(1), Rect::new(10, 5, 40, 15)),
            (id(2), Rect::new(50, 5, 90, 15)),
            (id(3), Rect::new(10, 30, 90, 40)),
        ];
        let grid = AreaGrid::build(1, bounds, &children);

        let total_w: i32 = (0..grid.width()).map(|c| grid.column_width(c)).sum();
        let total_h: i32 = (0..grid.height()).map(|r| grid.row_height(r)).sum();
        assert_eq!(total_w, bounds.width());
        assert_eq!(total_h, bounds.height());

        let p1 = grid.position(id(1)).unwrap();
        let p3 = grid.position(id(3)).unwrap();
        assert_eq!(p1.y1, p1.y2);
        assert!(p3.x2 > p1.x2);
        assert_eq!(grid.span_bounds(&p1), Rect::new(10, 5, 40, 15));
        assert_eq!(grid.cell(p1.x1 as usize, p1.y1 as usize), Some(id(1)));
    }

    #[test]
    fn test_overlapping_children_first_wins() {
        let bounds = Rect::new(0, 0, 20, 20);
        let children = vec![(id(1), Rect::new(0, 0, 10, 10)), (id(2), Rect::new(5, 5, 15, 15))];
        let grid = AreaGrid::build(1, bounds, &children);
        let col = grid.column_index(7);
        let row = grid.row_index(7);
        assert_eq!(grid.cell(col, row), Some(id(1)));
    }

    #[test]
    fn test_children_in_span() {
        let bounds = Rect::new(0, 0, 99, 99);
        let children = vec![(id(1), Rect::new(0, 0, 49, 49)), (id(2), Rect::new(50, 50, 99, 99))];
        let grid = AreaGrid::build(1, bounds, &children);
        let p1 = grid.position(id(1)).unwrap();
        assert_eq!(grid.children_in(&p1), vec![id(1)]);
        let all = Rect::new(0, 0, grid.width() as i32 - 1, grid.height() as i32 - 1);
        assert_eq!(grid.children_in(&all).len(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_query_panics() {
        let grid = AreaGrid::build(1, Rect::new(0, 0, 9, 9), &[]);
        grid.cell(5, 0);
    }
}
