//! Angles in degrees.

use std::f64::consts::PI;

use crate::AngularDirection;

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Map any angle into `[0, 360)`.
pub fn normalised_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Check if `angle` lies within the arc that starts at `start_angle` and sweeps
/// `sweep_angle` degrees (positive is clockwise).
pub fn is_in_arc_sweep(angle: f64, start_angle: f64, sweep_angle: f64) -> bool {
    let angle = normalised_angle(angle);
    let start = normalised_angle(start_angle);
    let end = normalised_angle(start_angle + sweep_angle);
    if sweep_angle > 0.0 {
        if start < end {
            (start..=end).contains(&angle)
        } else {
            angle > start || angle < end
        }
    } else if start > end {
        (end..=start).contains(&angle)
    } else {
        angle > end || angle < start
    }
}

/// Sweep between two polar angles going in `direction`.
///
/// Clockwise sweeps are positive, counter-clockwise sweeps negative.
pub fn sweep_angle(from: f64, to: f64, direction: AngularDirection) -> f64 {
    let from = normalised_angle(from);
    let to = normalised_angle(to);
    match direction {
        AngularDirection::Clockwise => {
            if to > from {
                to - from
            } else {
                360.0 + to - from
            }
        }
        AngularDirection::CounterClockwise => {
            if to < from {
                to - from
            } else {
                -360.0 + to - from
            }
        }
    }
}
