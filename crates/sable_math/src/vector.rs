//! NaN-safe vector helpers used by intersection and scattering.
//!
//! glam's own `normalize` divides by the length unconditionally, which turns a
//! degenerate direction into NaNs that then poison a whole pixel. Everything in
//! the renderer goes through these instead.

use crate::Vec3;

/// Threshold below which a value is treated as zero.
pub const EPSILON: f32 = 8e-7;

/// Returns true if `value` lies strictly inside `(-EPSILON, EPSILON)`.
#[inline]
pub fn almost_zero(value: f32) -> bool {
    -EPSILON < value && value < EPSILON
}

/// Square root that clamps non-positive inputs to zero instead of returning NaN.
#[inline]
pub fn safe_sqrt(value: f32) -> f32 {
    if value <= 0.0 {
        0.0
    } else {
        value.sqrt()
    }
}

/// Normalize a vector, returning zero when its squared length is almost zero.
#[inline]
pub fn normalize(value: Vec3) -> Vec3 {
    let squared = value.length_squared();
    if almost_zero(squared) {
        return Vec3::ZERO;
    }
    value * (1.0 / squared.sqrt())
}

/// Reflect `value` about `normal`: `2 * dot(v, n) * n - v`.
///
/// `value` points away from the surface, so the result does too.
#[inline]
pub fn reflect(value: Vec3, normal: Vec3) -> Vec3 {
    normal * (2.0 * value.dot(normal)) - value
}

/// Absolute value of the dot product.
#[inline]
pub fn abs_dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b).abs()
}

/// Flip `incident` onto the side of the surface `outgoing` is on.
///
/// If the two directions straddle the surface, `incident` is mirrored through
/// the tangent plane (reflected about `normal` after negation).
#[inline]
pub fn make_same_side(outgoing: Vec3, normal: Vec3, incident: Vec3) -> Vec3 {
    let dot_o = outgoing.dot(normal);
    let dot_i = incident.dot(normal);

    if dot_o * dot_i < 0.0 {
        reflect(-incident, normal)
    } else {
        incident
    }
}
