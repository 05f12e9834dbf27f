//! Line, ray and shape-boundary intersections.

use crate::{Circle, Ellipse, Line, Point, Ray, Rect};

pub fn midpoint(from: Point, to: Point) -> Point {
    Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0)
}

/// Intersection of two segments, using Paul Bourke's parametric form
/// (<http://paulbourke.net/geometry/pointlineplane/>).
///
/// Returns `None` if either segment has zero length, the segments are
/// parallel, or the crossing lies outside either segment.
pub fn line_intersect(line1: Line, line2: Line) -> Option<Point> {
    intersect(line1, line2, false)
}

/// Intersection of the infinite lines supporting two segments.
pub fn line_intersect_infinite(line1: Line, line2: Line) -> Option<Point> {
    intersect(line1, line2, true)
}

fn intersect(line1: Line, line2: Line, infinite_length: bool) -> Option<Point> {
    let (x1, y1) = (line1.from.x, line1.from.y);
    let (x2, y2) = (line1.to.x, line1.to.y);
    let (x3, y3) = (line2.from.x, line2.from.y);
    let (x4, y4) = (line2.to.x, line2.to.y);

    if (x1 == x2 && y1 == y2) || (x3 == x4 && y3 == y4) {
        return None;
    }

    let denominator = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denominator;
    let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denominator;

    if !infinite_length && !((0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)) {
        return None;
    }

    Some(Point::new(x1 + ua * (x2 - x1), y1 + ua * (y2 - y1)))
}

pub fn ray_intersect(ray1: Ray, ray2: Ray) -> Option<Point> {
    line_intersect_infinite(
        Line::new(ray1.origin, ray1.origin + ray1.direction),
        Line::new(ray2.origin, ray2.origin + ray2.direction),
    )
}

/// Real roots of `ax² + bx + c = 0`.
///
/// A zero `a` degrades to the linear equation `bx + c = 0`.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        return if b == 0.0 { Vec::new() } else { vec![-c / b] };
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        vec![(-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a)]
    } else if discriminant < 0.0 {
        Vec::new()
    } else {
        vec![-b / (2.0 * a)]
    }
}

/// Points where the line supporting `ray` crosses `circle`.
pub fn ray_circle_intersect(ray: Ray, circle: Circle) -> Vec<Point> {
    let Circle { x: a, y: b, r } = circle;
    if ray.is_vertical() {
        // x is fixed: y² - 2by + (b² + (x-a)² - r²) = 0
        let x = ray.origin.x;
        quadratic_roots(1.0, -2.0 * b, b * b + (x - a) * (x - a) - r * r)
            .into_iter()
            .map(|y| Point::new(x, y))
            .collect()
    } else {
        // substitute y = mx + c into (x-a)² + (y-b)² = r²
        let m = ray.gradient();
        let c = ray.y_intercept();
        quadratic_roots(
            m * m + 1.0,
            2.0 * (m * c - m * b - a),
            a * a + b * b + c * c - r * r - 2.0 * b * c,
        )
        .into_iter()
        .map(|x| Point::new(x, m * x + c))
        .collect()
    }
}

/// Where a line from `source` to the centre of `rect` crosses the boundary.
///
/// Only the two sides facing `source` are tested.
pub fn rect_incoming_line_intersect(source: Point, rect: Rect) -> Option<Point> {
    let center = rect.center();
    let incoming = Line::new(source, center);

    let vertical_side = if source.x <= center.x {
        Line::new(rect.top_left(), rect.bottom_left())
    } else {
        Line::new(rect.top_right(), rect.bottom_right())
    };
    let horizontal_side = if source.y <= center.y {
        Line::new(rect.top_left(), rect.top_right())
    } else {
        Line::new(rect.bottom_left(), rect.bottom_right())
    };

    line_intersect(incoming, vertical_side).or_else(|| line_intersect(incoming, horizontal_side))
}

/// Where a line from `source` to the centre of the diamond inscribed in
/// `diamond` crosses its boundary. The side is picked by quadrant.
pub fn diamond_incoming_line_intersect(source: Point, diamond: Rect) -> Option<Point> {
    let center = diamond.center();
    let incoming = Line::new(source, center);

    let side = match (source.x <= center.x, source.y <= center.y) {
        (true, true) => Line::new(diamond.center_left(), diamond.top_center()),
        (false, true) => Line::new(diamond.top_center(), diamond.center_right()),
        (false, false) => Line::new(diamond.center_right(), diamond.bottom_center()),
        (true, false) => Line::new(diamond.bottom_center(), diamond.center_left()),
    };

    line_intersect(incoming, side)
}

/// Where the ray from the centre of `ellipse` towards `source` crosses the
/// boundary. A `source` at the centre yields the centre itself.
pub fn ellipse_incoming_line_intersect(source: Point, ellipse: Ellipse) -> Point {
    let (a, b) = (ellipse.hw, ellipse.hh);
    let px = source.x - ellipse.x;
    let py = source.y - ellipse.y;

    let denominator = (a * a * py * py + b * b * px * px).sqrt();
    if denominator == 0.0 {
        return ellipse.center();
    }

    Point::new(
        a * b * px / denominator + ellipse.x,
        a * b * py / denominator + ellipse.y,
    )
}
