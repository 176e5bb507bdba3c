//! Additional math helpers layered on top of `glam`.

use glam::Vec3;

/// Segments shorter than this are treated as degenerate by the solvers.
pub const DEGENERATE_LENGTH: f32 = 1e-6;

/// Removes the component of `v` along the (unit) surface `normal`, keeping only
/// the tangential part.
pub fn slide(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Splits `segment` into its length and unit direction, or `None` when the
/// segment is too short to carry a direction.
pub fn length_and_direction(segment: Vec3) -> Option<(f32, Vec3)> {
    let length = segment.length();
    if length < DEGENERATE_LENGTH || !length.is_finite() {
        return None;
    }
    Some((length, segment / length))
}

/// Extends a movement vector by `extra` units along its own direction.
pub fn extend_by(movement: Vec3, extra: f32) -> Vec3 {
    movement + movement.normalize_or_zero() * extra
}

/// Returns a unit vector perpendicular to `v`, preferring the plane spanned by
/// `v` and `hint` when they are not parallel.
pub fn perpendicular_towards(v: Vec3, hint: Vec3) -> Vec3 {
    let dir = v.normalize_or_zero();
    let projected = hint - dir * hint.dot(dir);
    projected
        .try_normalize()
        .unwrap_or_else(|| dir.any_orthonormal_vector())
}
