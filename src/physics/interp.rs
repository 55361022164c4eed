//! Scalar and vector interpolation helpers

use nalgebra::Vector3;

/// Fraction of `value` between `a` and `b` (0 at `a`, 1 at `b`), unclamped.
/// A zero-width interval maps everything to 0.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    let span = b - a;
    if span.abs() < f32::EPSILON {
        return 0.0;
    }
    (value - a) / span
}

pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Elbow placement weight for a clamped interval: |1 - t²|
pub fn window(t: f32) -> f32 {
    (1.0 - t * t).abs()
}

/// Point `t` of the way from `a` to `b`
pub fn lerp(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t
}
