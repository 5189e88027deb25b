//! Random sampling helpers.
//!
//! All functions take the generator explicitly. Each render worker owns its
//! own seeded generator, so nothing here touches shared or thread-local state.

use rand::Rng;
use sable_math::{normalize, Vec3};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Random point inside the unit ball (rejection sampling).
pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) * 2.0 - Vec3::ONE;
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Random direction on the unit sphere.
///
/// May return the zero vector when the ball sample lands on the origin.
#[inline]
pub fn random_on_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    normalize(random_in_sphere(rng))
}
