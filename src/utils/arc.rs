//! Placement helpers that lay a fixed number of equal segments between two
//! points when the segments are longer in total than the straight chord.

use glam::Vec3;

use super::math::perpendicular_towards;

const SLACK_EPSILON: f32 = 1e-5;
const ARC_SOLVER_ITERATIONS: usize = 64;

/// Evenly spaced points on the straight line from `a` towards `b`.
///
/// The points keep `segment_length` spacing even when that over- or
/// undershoots `b`.
pub fn straight_points(a: Vec3, b: Vec3, segment_length: f32, segment_count: usize) -> Vec<Vec3> {
    let dir = (b - a).normalize_or_zero();
    (0..=segment_count)
        .map(|i| a + dir * segment_length * i as f32)
        .collect()
}

fn has_slack(a: Vec3, b: Vec3, segment_length: f32, segment_count: usize) -> bool {
    segment_count >= 2 && segment_length * segment_count as f32 - a.distance(b) > SLACK_EPSILON
}

/// Solves `chord = 2 R sin(theta / 2)`, `arc = R theta` for the sweep angle
/// `theta` in `(0, 2π)`.
pub fn arc_sweep_angle(chord: f32, arc: f32) -> f32 {
    let ratio = (chord as f64 / arc as f64).clamp(0.0, 1.0);
    let g = |theta: f64| 2.0 * (theta * 0.5).sin() - ratio * theta;
    let dg = |theta: f64| (theta * 0.5).cos() - ratio;

    let mut low = 1e-9_f64;
    let mut high = std::f64::consts::TAU;
    let mut theta = (2.0 * (6.0 * (1.0 - ratio)).sqrt()).clamp(1e-3, high - 1e-3);

    for _ in 0..ARC_SOLVER_ITERATIONS {
        let value = g(theta);
        if value.abs() < 1e-12 {
            break;
        }
        // g is positive below the root and negative above it.
        if value > 0.0 {
            low = theta;
        } else {
            high = theta;
        }

        let slope = dg(theta);
        let newton = theta - value / slope;
        theta = if slope.abs() > 1e-12 && newton > low && newton < high {
            newton
        } else {
            0.5 * (low + high)
        };
    }

    theta as f32
}

/// Places `segment_count + 1` points on the circular arc of length
/// `segment_length * segment_count` through `a` and `b`, bulging towards
/// `bow`. Falls back to [`straight_points`] when there is no slack.
pub fn arc_points(a: Vec3, b: Vec3, bow: Vec3, segment_length: f32, segment_count: usize) -> Vec<Vec3> {
    if !has_slack(a, b, segment_length, segment_count) || a.distance(b) < SLACK_EPSILON {
        return straight_points(a, b, segment_length, segment_count);
    }

    let chord = a.distance(b);
    let arc = segment_length * segment_count as f32;
    let theta = arc_sweep_angle(chord, arc);
    let radius = arc / theta;

    let x_axis = (b - a) / chord;
    let y_axis = perpendicular_towards(x_axis, bow);
    let center = a + x_axis * (chord * 0.5) - y_axis * (radius * (theta * 0.5).cos());

    let start_angle = std::f32::consts::FRAC_PI_2 + theta * 0.5;
    let step = theta / segment_count as f32;

    let mut points = Vec::with_capacity(segment_count + 1);
    points.push(a);
    for i in 1..segment_count {
        let angle = start_angle - step * i as f32;
        points.push(center + (x_axis * angle.cos() + y_axis * angle.sin()) * radius);
    }
    points.push(b);
    points
}

/// Alternating up/down segments of exactly `segment_length` that take up the
/// slack between `a` and `b`. With an odd segment count the last segment runs
/// straight into `b`.
pub fn zigzag_points(a: Vec3, b: Vec3, bow: Vec3, segment_length: f32, segment_count: usize) -> Vec<Vec3> {
    if !has_slack(a, b, segment_length, segment_count) || a.distance(b) < SLACK_EPSILON {
        return straight_points(a, b, segment_length, segment_count);
    }

    let distance = a.distance(b);
    let right = (b - a) / distance;
    let up = perpendicular_towards(right, bow);

    let is_odd = segment_count % 2 != 0;
    let placement_distance = if is_odd { distance - segment_length } else { distance };
    let placement_count = if is_odd { segment_count - 1 } else { segment_count };

    let cos = (placement_distance / (placement_count as f32 * segment_length)).clamp(-1.0, 1.0);
    let sin = (1.0 - cos * cos).max(0.0).sqrt();

    let mut points = Vec::with_capacity(segment_count + 1);
    points.push(a);
    for i in 1..=placement_count {
        let side = if i % 2 == 1 { sin } else { -sin };
        let previous = points[i - 1];
        points.push(previous + (right * cos + up * side) * segment_length);
    }
    if is_odd {
        points.push(b);
    } else if let Some(last) = points.last_mut() {
        *last = b;
    }
    points
}
