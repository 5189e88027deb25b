//! Path integration.
//!
//! Traces one camera ray through the scene, bouncing off surfaces and
//! accumulating emitted and escaping light weighted by the path throughput.
//! The path state lives in an explicit loop rather than on the call stack.

use crate::material::{Color, MaterialTable};
use crate::scene::Scene;
use rand::Rng;
use sable_math::{abs_dot, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Rec. 709 luminance weights.
const LUMINANCE: Vec3 = Vec3::new(0.212671, 0.715160, 0.072169);

/// Upper bound on path vertices under [`Termination::Energy`].
///
/// Only reached by paths that lose no energy, such as a ray trapped between
/// two lossless mirrors.
pub const MAX_PATH_VERTICES: u32 = 4096;

/// Perceived brightness of a color.
#[inline]
pub fn luminance(color: Color) -> f32 {
    color.dot(LUMINANCE)
}

/// Whether a color contains NaN or infinity in any channel.
#[inline]
pub fn is_invalid(color: Color) -> bool {
    !(color.x + color.y + color.z).is_finite()
}

/// When a path stops bouncing.
///
/// Neither policy is unbiased: both simply drop whatever light the path would
/// have gathered past the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Follow at most `max_bounces` surface hits; a path that runs out of
    /// budget picks up the background along its current direction.
    Depth { max_bounces: u32 },
    /// Stop once the luminance of the path throughput drops below `cutoff`,
    /// keeping only the light gathered so far.
    Energy { cutoff: f32 },
}

impl Default for Termination {
    fn default() -> Self {
        Termination::Depth { max_bounces: 128 }
    }
}

/// Light arriving from directions that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// The direction squared componentwise.
    #[default]
    DirectionSquared,
    /// A constant color.
    Solid(Color),
    /// White at the horizon blending to light blue overhead.
    SkyGradient,
}

impl Background {
    /// Radiance seen along `direction`.
    pub fn radiance(&self, direction: Vec3) -> Color {
        match *self {
            Background::DirectionSquared => direction * direction,
            Background::Solid(color) => color,
            Background::SkyGradient => sky_gradient(direction),
        }
    }
}

/// Compute sky gradient background.
fn sky_gradient(direction: Vec3) -> Color {
    let unit_direction = sable_math::normalize(direction);
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Estimates incoming radiance along camera rays.
#[derive(Debug, Clone, Copy)]
pub struct Integrator<'a> {
    scene: &'a Scene,
    materials: &'a MaterialTable,
    termination: Termination,
    background: Background,
}

impl<'a> Integrator<'a> {
    pub fn new(scene: &'a Scene, materials: &'a MaterialTable) -> Self {
        Self {
            scene,
            materials,
            termination: Termination::default(),
            background: Background::default(),
        }
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Estimate the radiance arriving along `ray`.
    ///
    /// Emission is added once, at the surface that emits it, scaled by the
    /// throughput that reaches that surface. The cosine factor is applied here
    /// and never inside the material weights.
    pub fn trace<R: Rng + ?Sized>(&self, ray: &Ray, rng: &mut R) -> Color {
        let mut ray = *ray;
        let mut throughput = Color::ONE;
        let mut radiance = Color::ZERO;

        let mut remaining = match self.termination {
            Termination::Depth { max_bounces } => max_bounces,
            Termination::Energy { .. } => MAX_PATH_VERTICES,
        };

        loop {
            if remaining == 0 {
                if let Termination::Depth { .. } = self.termination {
                    radiance += throughput * self.background.radiance(ray.direction());
                }
                break;
            }
            remaining -= 1;

            let Some(hit) = self.scene.intersect(&ray) else {
                radiance += throughput * self.background.radiance(ray.direction());
                break;
            };

            let material = self.materials.get(hit.material);
            let outgoing = -ray.direction();

            radiance += throughput * material.emitted();

            let scatter = material.scatter(outgoing, hit.normal, rng);
            throughput *= scatter.weight * abs_dot(hit.normal, scatter.incident);

            if throughput == Color::ZERO {
                break;
            }
            if let Termination::Energy { cutoff } = self.termination {
                if luminance(throughput) < cutoff {
                    break;
                }
            }

            ray = ray.bounce(hit.distance, scatter.incident);
        }

        radiance
    }
}
