//! Axis-aligned integer rectangles.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with inclusive integer coordinates.
///
/// `(x1, y1)` is the top-left pixel and `(x2, y2)` the bottom-right pixel, so
/// a rectangle covering a single pixel has `x1 == x2` and `y1 == y2`. A
/// rectangle whose `x2 < x1` or `y2 < y1` is empty; empty rectangles appear
/// as the result of splits and intersections and are never stored as bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x1: i32,
    /// Top edge
    pub y1: i32,
    /// Right edge (inclusive)
    pub x2: i32,
    /// Bottom edge (inclusive)
    pub y2: i32,
}

impl Rect {
    /// Create a rectangle from its corner coordinates.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from a position and a size.
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width - 1,
            y2: y + height - 1,
        }
    }

    /// Width in pixels (0 or negative for empty rectangles).
    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    /// Height in pixels (0 or negative for empty rectangles).
    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// Covered area in square pixels, 0 for empty rectangles.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }

    /// Whether the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    /// Horizontal center.
    pub fn mid_x(&self) -> i32 {
        (self.x1 + self.x2) / 2
    }

    /// Vertical center.
    pub fn mid_y(&self) -> i32 {
        (self.y1 + self.y2) / 2
    }

    /// Check if a point lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Check if `other` lies completely inside this rectangle.
    pub fn encloses(&self, other: &Rect) -> bool {
        self.encloses_x(other) && self.encloses_y(other)
    }

    /// Check if the horizontal extent of `other` lies inside this one.
    pub fn encloses_x(&self, other: &Rect) -> bool {
        other.x1 >= self.x1 && other.x2 <= self.x2
    }

    /// Check if the vertical extent of `other` lies inside this one.
    pub fn encloses_y(&self, other: &Rect) -> bool {
        other.y1 >= self.y1 && other.y2 <= self.y2
    }

    /// Check if the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersects_x(other) && self.intersects_y(other)
    }

    /// Check if the horizontal extents overlap.
    pub fn intersects_x(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2
    }

    /// Check if the vertical extents overlap.
    pub fn intersects_y(&self, other: &Rect) -> bool {
        self.y1 <= other.y2 && other.y1 <= self.y2
    }

    /// The common part of two rectangles (may be empty).
    pub fn intersection(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        }
    }

    /// The smallest rectangle enclosing both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Grow this rectangle so that it encloses `other`.
    pub fn expand_to_enclose(&mut self, other: &Rect) {
        *self = self.union(other);
    }

    /// Shift the rectangle by the given offsets.
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Clip this rectangle to `clip` (returns an empty rectangle when disjoint).
    pub fn clip(&self, clip: &Rect) -> Rect {
        self.intersection(clip)
    }

    /// Split horizontally by `other`.
    ///
    /// This rectangle keeps the part left of `other`; the part right of it is
    /// returned. When the left part would be empty, this rectangle becomes the
    /// right part and `None` is returned. Rectangles that do not intersect
    /// `other` are left untouched.
    pub fn h_split(&mut self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let mut left = *self;
        let mut right = *self;
        left.x2 = left.x2.min(other.x1 - 1);
        right.x1 = right.x1.max(other.x2 + 1);
        if left.is_empty() {
            *self = right;
            None
        } else {
            *self = left;
            if right.is_empty() {
                None
            } else {
                Some(right)
            }
        }
    }

    /// Split vertically by `other`.
    ///
    /// This rectangle keeps the part above `other`; the part below it is
    /// returned. Mirrors [`Rect::h_split`].
    pub fn v_split(&mut self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let mut top = *self;
        let mut bottom = *self;
        top.y2 = top.y2.min(other.y1 - 1);
        bottom.y1 = bottom.y1.max(other.y2 + 1);
        if top.is_empty() {
            *self = bottom;
            None
        } else {
            *self = top;
            if bottom.is_empty() {
                None
            } else {
                Some(bottom)
            }
        }
    }

    /// Parts of this rectangle left after removing `other`.
    ///
    /// Returns up to four pieces: the full-width bands above and below `other`
    /// and the bands left and right of it within `other`'s vertical extent.
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        if !self.intersects(other) {
            return vec![*self];
        }
        let cut = self.intersection(other);
        let candidates = [
            Rect::new(self.x1, self.y1, self.x2, cut.y1 - 1),
            Rect::new(self.x1, cut.y2 + 1, self.x2, self.y2),
            Rect::new(self.x1, cut.y1, cut.x1 - 1, cut.y2),
            Rect::new(cut.x2 + 1, cut.y1, self.x2, cut.y2),
        ];
        candidates.into_iter().filter(|r| !r.is_empty()).collect()
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{} - {},{}]", self.x1, self.y1, self.x2, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_area() {
        let r = Rect::new(0, 0, 9, 4);
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 5);
        assert_eq!(r.area(), 50);
        assert_eq!(Rect::from_size(0, 0, 10, 5), r);
        assert_eq!(Rect::new(5, 0, 4, 10).area(), 0);
    }

    #[test]
    fn test_enclose_and_intersect() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(10, 10, 20, 20);
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert!(outer.intersects(&inner));

        let other = Rect::new(101, 0, 120, 10);
        assert!(!outer.intersects(&other));
        assert!(outer.intersection(&other).is_empty());
        assert_eq!(outer.union(&other), Rect::new(0, 0, 120, 100));
    }

    #[test]
    fn test_union_with_empty() {
        let r = Rect::new(1, 1, 5, 5);
        let empty = Rect::new(0, 0, -1, -1);
        assert_eq!(r.union(&empty), r);
        assert_eq!(empty.union(&r), r);
    }

    #[test]
    fn test_h_split() {
        let mut r = Rect::new(0, 0, 100, 10);
        let right = r.h_split(&Rect::new(40, 0, 59, 10));
        assert_eq!(r, Rect::new(0, 0, 39, 10));
        assert_eq!(right, Some(Rect::new(60, 0, 100, 10)));

        // cut at the left edge keeps only the right part
        let mut r = Rect::new(0, 0, 100, 10);
        assert_eq!(r.h_split(&Rect::new(0, 0, 20, 10)), None);
        assert_eq!(r, Rect::new(21, 0, 100, 10));
    }

    #[test]
    fn test_v_split() {
        let mut r = Rect::new(0, 0, 10, 100);
        let bottom = r.v_split(&Rect::new(0, 30, 10, 39));
        assert_eq!(r, Rect::new(0, 0, 10, 29));
        assert_eq!(bottom, Some(Rect::new(0, 40, 10, 100)));

        let mut untouched = Rect::new(0, 0, 10, 10);
        assert_eq!(untouched.v_split(&Rect::new(50, 50, 60, 60)), None);
        assert_eq!(untouched, Rect::new(0, 0, 10, 10));
    }

    #[test]
    fn test_subtract() {
        let r = Rect::new(0, 0, 99, 99);
        let parts = r.subtract(&Rect::new(40, 40, 59, 59));
        assert_eq!(parts.len(), 4);
        let total: i64 = parts.iter().map(|p| p.area()).sum();
        assert_eq!(total, 100 * 100 - 20 * 20);
    }
}
