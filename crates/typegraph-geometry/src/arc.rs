//! Circular arcs used for curved (parallel or self-loop) edges.

use crate::angle::{is_in_arc_sweep, normalised_angle, rad_to_deg, sweep_angle};
use crate::intersect::{midpoint, ray_circle_intersect, ray_intersect};
use crate::{AngularDirection, Arc, Line, Point, Ray, Rect, Size};

/// Check if three points are collinear, within a tolerance relative to their spread.
pub fn collinear(point1: Point, point2: Point, point3: Point) -> bool {
    let spread = [
        point1.x - point2.x,
        point1.x - point3.x,
        point2.x - point3.x,
        point1.y - point2.y,
        point1.y - point3.y,
        point2.y - point3.y,
    ]
    .iter()
    .fold(0.0_f64, |acc, d| acc.max(d.abs()));
    let tolerance = spread * 1e-5;
    let cross = (point2.x - point1.x) * (point3.y - point1.y) - (point3.x - point1.x) * (point2.y - point1.y);
    cross.abs() <= tolerance
}

/// An undirected normal of `vector`.
pub fn normal_vector(vector: Point) -> Point {
    Point::new(vector.y, -vector.x)
}

fn polar_angle(point: Point, center: Point) -> f64 {
    let d = point - center;
    rad_to_deg(d.y.atan2(d.x))
}

/// The circular arc starting at `point1`, passing through `point2` and ending
/// at `point3`.
///
/// The centre is where the perpendicular bisectors of the two chords meet.
/// Returns `None` for (effectively) collinear points.
pub fn arc_through_points(point1: Point, point2: Point, point3: Point) -> Option<Arc> {
    if collinear(point1, point2, point3) {
        return None;
    }

    let bisector1 = Ray::new(midpoint(point1, point2), normal_vector(point2 - point1));
    let bisector2 = Ray::new(midpoint(point2, point3), normal_vector(point3 - point2));
    let center = ray_intersect(bisector1, bisector2)?;

    let radius = center.distance(point1);
    let top_left = center - Point::new(radius, radius);

    let t1 = polar_angle(point1, center);
    let t2 = polar_angle(point2, center);
    let t3 = polar_angle(point3, center);

    let clockwise =
        (t1..=t3).contains(&t2) || (t2..=t1).contains(&t3) || (t3..=t2).contains(&t1);
    let direction = if clockwise {
        AngularDirection::Clockwise
    } else {
        AngularDirection::CounterClockwise
    };

    Some(Arc {
        top_left,
        size: Size::new(radius * 2.0, radius * 2.0),
        start_angle: t1,
        sweep_angle: sweep_angle(t1, t3, direction),
    })
}

/// Polar angles (around the arc centre) at which `line` crosses `arc`.
///
/// Non-circular arcs never intersect.
pub fn line_arc_intersect_angles(line: Line, arc: Arc) -> Vec<f64> {
    let Some(circle) = arc.to_circle() else {
        return Vec::new();
    };
    let center = Point::new(circle.x, circle.y);

    // one unit of slack so axis-aligned segments still bound their hits
    let bounds = Rect::from_ltrb(
        line.from.x.min(line.to.x),
        line.from.y.min(line.to.y),
        line.from.x.max(line.to.x),
        line.from.y.max(line.to.y),
    )
    .inflate(1.0);

    ray_circle_intersect(line.to_ray(), circle)
        .into_iter()
        .filter(|p| bounds.contains(*p))
        .map(|p| normalised_angle(polar_angle(p, center)))
        .filter(|angle| is_in_arc_sweep(*angle, arc.start_angle, arc.sweep_angle))
        .collect()
}

pub fn rect_arc_intersect_angles(arc: Arc, rect: Rect) -> Vec<f64> {
    rect.lines()
        .into_iter()
        .flat_map(|line| line_arc_intersect_angles(line, arc))
        .collect()
}

pub fn diamond_arc_intersect_angles(arc: Arc, diamond: Rect) -> Vec<f64> {
    diamond
        .diamond_lines()
        .into_iter()
        .flat_map(|line| line_arc_intersect_angles(line, arc))
        .collect()
}
