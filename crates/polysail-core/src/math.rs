//! Angle helpers shared by the entities.
//!
//! Compass angles are degrees in `[0, 360)`. `rem_euclid` alone can round a
//! tiny negative value up to exactly `360.0`, so every wrap goes through
//! [`normalize_degrees`].

use glam::Vec2;

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
#[must_use]
pub fn signed_angle_diff(from: f32, to: f32) -> f32 {
    let diff = normalize_degrees(to - from);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Unit vector of a compass heading in screen space (0° up, clockwise).
#[must_use]
pub fn compass_forward(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

/// Unit vector of a mathematical angle (0° along +x, toward +y).
#[must_use]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
