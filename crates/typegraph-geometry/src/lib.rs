//! Pure 2D geometry for routing graph edges between vertex bodies.
//!
//! Everything here is stateless: the renderer calls these functions once per
//! visible edge per frame to find where a line should stop at a vertex
//! boundary, where its arrowhead goes and where its label sits.
//!
//! Coordinates are screen-style: `x` grows to the right, `y` grows downwards,
//! so positive angles sweep clockwise.

mod angle;
mod arc;
mod arrow;
mod intersect;
mod shapes;

use std::ops::{Add, Div, Mul, Neg, Sub};

pub use angle::{deg_to_rad, is_in_arc_sweep, normalised_angle, rad_to_deg, sweep_angle};
pub use arc::{
    arc_through_points, collinear, diamond_arc_intersect_angles, line_arc_intersect_angles,
    normal_vector, rect_arc_intersect_angles,
};
pub use arrow::{arrowhead, Arrowhead};
pub use intersect::{
    diamond_incoming_line_intersect, ellipse_incoming_line_intersect, line_intersect,
    line_intersect_infinite, midpoint, quadratic_roots, ray_circle_intersect, ray_intersect,
    rect_incoming_line_intersect,
};
pub use shapes::{AngularDirection, Arc, Circle, Ellipse, Line, Ray, Rect, Size};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when read as a vector.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len == 0.0 {
            None
        } else {
            Some(*self / len)
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

#[cfg(test)]
pub(crate) fn assert_point_eq(expected: Point, actual: Point) {
    assert!(
        (expected.x - actual.x).abs() < 1e-6 && (expected.y - actual.y).abs() < 1e-6,
        "expected {expected:?}, actual {actual:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_ops() {
        let a = Point::new(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a + Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert_eq!(a - a, Point::ZERO);
        assert_eq!(-a * 2.0, Point::new(-6.0, -8.0));
        assert_point_eq(Point::new(0.6, 0.8), a.normalized().unwrap());
        assert!(Point::ZERO.normalized().is_none());
    }
}
