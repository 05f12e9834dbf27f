//! Transient shape values.

use crate::angle::{deg_to_rad, normalised_angle};
use crate::Point;

/// A segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// The ray starting at `from` and pointing through `to`.
    pub fn to_ray(&self) -> Ray {
        Ray::new(self.from, self.to - self.from)
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// A half-line given by an origin and a direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Point,
}

impl Ray {
    pub fn new(origin: Point, direction: Point) -> Self {
        Self { origin, direction }
    }

    pub fn is_vertical(&self) -> bool {
        self.direction.x == 0.0
    }

    /// Slope `dy/dx`; infinite for vertical rays.
    pub fn gradient(&self) -> f64 {
        if self.is_vertical() {
            f64::INFINITY
        } else {
            self.direction.y / self.direction.x
        }
    }

    /// Where the supporting line crosses `x = 0`; NaN for vertical rays.
    pub fn y_intercept(&self) -> f64 {
        if self.is_vertical() {
            f64::NAN
        } else {
            self.origin.y - (self.origin.x * self.direction.y) / self.direction.x
        }
    }
}

/// Width and height of an axis-aligned box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle. Diamonds are described by their bounding `Rect`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_top_left_size(top_left: Point, size: Size) -> Self {
        Self::from_ltrb(
            top_left.x,
            top_left.y,
            top_left.x + size.width,
            top_left.y + size.height,
        )
    }

    pub fn from_center_size(center: Point, width: f64, height: f64) -> Self {
        Self::from_ltrb(
            center.x - width / 2.0,
            center.y - height / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right, self.top)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn center_left(&self) -> Point {
        Point::new(self.left, self.center().y)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.center().x, self.top)
    }

    pub fn center_right(&self) -> Point {
        Point::new(self.right, self.center().y)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.center().x, self.bottom)
    }

    /// Grow the rectangle by `delta` on every side.
    pub fn inflate(&self, delta: f64) -> Rect {
        Rect::from_ltrb(
            self.left - delta,
            self.top - delta,
            self.right + delta,
            self.bottom + delta,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// The four sides, clockwise from the left side.
    pub fn lines(&self) -> [Line; 4] {
        [
            Line::new(self.bottom_left(), self.top_left()),
            Line::new(self.top_left(), self.top_right()),
            Line::new(self.top_right(), self.bottom_right()),
            Line::new(self.bottom_right(), self.bottom_left()),
        ]
    }

    /// The four sides of the rhombus inscribed in this rectangle.
    pub fn diamond_lines(&self) -> [Line; 4] {
        [
            Line::new(self.center_left(), self.top_center()),
            Line::new(self.top_center(), self.center_right()),
            Line::new(self.center_right(), self.bottom_center()),
            Line::new(self.bottom_center(), self.center_left()),
        ]
    }

    /// Containment test for the rhombus inscribed in this rectangle.
    pub fn diamond_contains(&self, point: Point) -> bool {
        let hw = self.width() / 2.0;
        let hh = self.height() / 2.0;
        if hw <= 0.0 || hh <= 0.0 {
            return false;
        }
        let c = self.center();
        (point.x - c.x).abs() / hw + (point.y - c.y).abs() / hh <= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }
}

/// An axis-aligned ellipse given by centre and semi-axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub x: f64,
    pub y: f64,
    /// Half-width.
    pub hw: f64,
    /// Half-height.
    pub hh: f64,
}

impl Ellipse {
    pub fn new(x: f64, y: f64, hw: f64, hh: f64) -> Self {
        Self { x, y, hw, hh }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.hw <= 0.0 || self.hh <= 0.0 {
            return false;
        }
        let dx = (point.x - self.x) / self.hw;
        let dy = (point.y - self.y) / self.hh;
        dx * dx + dy * dy <= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngularDirection {
    Clockwise,
    CounterClockwise,
}

/// An elliptical arc, described the way drawing surfaces take it: bounding
/// box plus start and sweep angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub top_left: Point,
    pub size: Size,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl Arc {
    pub fn center(&self) -> Point {
        self.top_left + Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    pub fn direction(&self) -> AngularDirection {
        if self.sweep_angle > 0.0 {
            AngularDirection::Clockwise
        } else {
            AngularDirection::CounterClockwise
        }
    }

    /// End angle normalised to `[0, 360)`.
    pub fn end_angle(&self) -> f64 {
        normalised_angle(self.start_angle + self.sweep_angle)
    }

    pub fn offset_at_angle(&self, angle: f64) -> Point {
        let rad = deg_to_rad(angle);
        self.center()
            + Point::new(
                rad.cos() * self.size.width / 2.0,
                rad.sin() * self.size.height / 2.0,
            )
    }

    /// The supporting circle, or `None` if the arc is not circular.
    pub fn to_circle(&self) -> Option<Circle> {
        if self.size.height == 0.0 {
            return None;
        }
        let ratio = self.size.width / self.size.height;
        if !(0.999..=1.001).contains(&ratio) {
            return None;
        }
        let c = self.center();
        Some(Circle::new(c.x, c.y, self.size.height / 2.0))
    }
}
