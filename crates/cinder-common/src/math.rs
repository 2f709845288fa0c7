//! 2D math helpers shared by the particle integrator.
//!
//! Vectors are `glam::Vec2`. Configuration data arrives in degrees; everything
//! past `Particle::init` works in radians.

pub use glam::Vec2;

/// Degrees to radians multiplier.
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

/// Rotates a point by an angle given in degrees.
#[must_use]
pub fn rotate_point(degrees: f32, point: Vec2) -> Vec2 {
    let (s, c) = (degrees * DEG_TO_RAD).sin_cos();
    Vec2::new(point.x * c - point.y * s, point.x * s + point.y * c)
}

/// Unit vector pointing along `degrees` (0 = +X).
#[must_use]
pub fn unit_heading(degrees: f32) -> Vec2 {
    rotate_point(degrees, Vec2::X)
}

/// Angle of a vector in radians, measured from +X.
#[must_use]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Returns true if `limit` should be enforced as a speed cap.
///
/// NaN, infinite, zero and negative values all disable the cap.
#[must_use]
pub fn is_valid_limit(limit: f32) -> bool {
    limit.is_finite() && limit > 0.0
}

/// Caps the length of `v` at `max`, keeping its direction.
///
/// The length is computed once and reused for the rescale.
#[must_use]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max {
        v * (max / len)
    } else {
        v
    }
}

/// Linear interpolation that returns `a` at `t == 0` and `b` at `t >= 1`
/// bit-for-bit, and is monotonic in `t` between them.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}
