//! Geometry primitives used by the routing engine

use serde::{Deserialize, Serialize};

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle describing a terminal's extent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rectangle at the given point
    pub fn at_point(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Axis-aligned bounding box of this rectangle rotated around its center
    /// by the given angle in degrees (clockwise positive)
    pub fn rotated_bounds(&self, degrees: f64) -> Rect {
        if degrees == 0.0 {
            return *self;
        }

        let rad = degrees.to_radians();
        let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
        let w = self.width * cos + self.height * sin;
        let h = self.width * sin + self.height * cos;
        let c = self.center();
        Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    }

    /// Scale all coordinates down by the given factor, rounding to 0.1
    pub fn unscaled(&self, scale: f64) -> Rect {
        Rect::new(
            round1(self.x / scale),
            round1(self.y / scale),
            round1(self.width / scale),
            round1(self.height / scale),
        )
    }
}

/// Round to one decimal place
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let c = r.center();
        assert_eq!(c.x, 50.0);
        assert_eq!(c.y, 25.0);
    }

    #[test]
    fn test_rect_contains_is_edge_inclusive() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains(Point::new(50.0, 50.0)));
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(100.0, 100.0)));
        assert!(!r.contains(Point::new(-1.0, 50.0)));
        assert!(!r.contains(Point::new(101.0, 50.0)));
    }

    #[test]
    fn test_rotated_bounds_quarter_turn() {
        let r = Rect::new(0.0, 0.0, 100.0, 40.0);
        let b = r.rotated_bounds(90.0);
        // Width and height swap; center stays put.
        assert!((b.width - 40.0).abs() < 1e-9);
        assert!((b.height - 100.0).abs() < 1e-9);
        assert_eq!(b.center(), r.center());
    }

    #[test]
    fn test_rotated_bounds_zero_is_identity() {
        let r = Rect::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(r.rotated_bounds(0.0), r);
    }
}
