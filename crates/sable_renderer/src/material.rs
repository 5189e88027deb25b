//! Surface materials and BSDF sampling.
//!
//! The set of behaviours is closed: a [`Material`] is one of a few variants
//! and scattering is an exhaustive `match`. Primitives refer to materials by
//! [`MaterialId`], resolved through a [`MaterialTable`]; ids with no entry
//! shade as a black, fully absorbing surface.
//!
//! Directions follow the convention that both `outgoing` (towards the viewer)
//! and the sampled `incident` direction point away from the surface.

use crate::sampling::{gen_f32, random_on_sphere};
use rand::Rng;
use sable_math::{abs_dot, almost_zero, make_same_side, normalize, reflect, safe_sqrt, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_1_PI, PI};

/// Color type alias (linear RGB, unbounded above during accumulation)
pub type Color = Vec3;

/// Index of a material in a [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Material used when a primitive is inserted without one.
    pub const DEFAULT: MaterialId = MaterialId(0);
}

/// How a Lambertian surface picks its incident direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HemisphereSampling {
    /// Uniform over the hemisphere, pdf `1 / 2π`.
    #[default]
    Uniform,
    /// Cosine-weighted, pdf `|cos θ| / π`.
    Cosine,
}

/// One sampled scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// BSDF value divided by the sampling pdf (cosine term not included)
    pub weight: Color,
    /// Sampled incident direction, pointing away from the surface
    pub incident: Vec3,
}

impl Scatter {
    /// Nothing leaves the surface.
    pub const ABSORBED: Scatter = Scatter {
        weight: Color::ZERO,
        incident: Vec3::ZERO,
    };

    /// Whether the sample carries no energy.
    #[inline]
    pub fn is_absorbed(&self) -> bool {
        self.weight == Color::ZERO
    }
}

/// Surface scattering behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Ideal diffuse reflector.
    Lambertian {
        albedo: Color,
        sampling: HemisphereSampling,
    },
    /// Perfect specular reflector.
    Mirror { tint: Color },
    /// Smooth dielectric that reflects or transmits by Fresnel reflectance.
    ///
    /// `eta` is the relative index of refraction seen from the side the
    /// normal points to.
    Fresnel { eta: f32, tint: Color },
    /// Light source; emits and scatters nothing.
    Emissive { emission: Color },
    /// Black surface.
    Absorbing,
}

static ABSORBING: Material = Material::Absorbing;

impl Material {
    /// Lambertian material with uniform hemisphere sampling.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian {
            albedo,
            sampling: HemisphereSampling::Uniform,
        }
    }

    /// Sample an incident direction for light leaving towards `outgoing`.
    ///
    /// `normal` is the outward surface normal; it is not flipped towards the
    /// viewer, each variant handles both sides itself.
    pub fn scatter<R: Rng + ?Sized>(&self, outgoing: Vec3, normal: Vec3, rng: &mut R) -> Scatter {
        match *self {
            Material::Lambertian { albedo, sampling } => {
                scatter_lambertian(albedo, sampling, outgoing, normal, rng)
            }
            Material::Mirror { tint } => {
                let incident = reflect(outgoing, normal);
                specular(tint, incident, normal)
            }
            Material::Fresnel { eta, tint } => scatter_fresnel(eta, tint, outgoing, normal, rng),
            Material::Emissive { .. } | Material::Absorbing => Scatter::ABSORBED,
        }
    }

    /// Light emitted by the surface.
    pub fn emitted(&self) -> Color {
        match *self {
            Material::Emissive { emission } => emission,
            _ => Color::ZERO,
        }
    }

}

fn scatter_lambertian<R: Rng + ?Sized>(
    albedo: Color,
    sampling: HemisphereSampling,
    outgoing: Vec3,
    normal: Vec3,
    rng: &mut R,
) -> Scatter {
    let (incident, pdf) = match sampling {
        HemisphereSampling::Uniform => (random_on_sphere(rng), 1.0 / (2.0 * PI)),
        HemisphereSampling::Cosine => {
            let incident = normalize(normal + random_on_sphere(rng));
            (incident, abs_dot(incident, normal) / PI)
        }
    };

    let incident = make_same_side(outgoing, normal, incident);
    if almost_zero(pdf) {
        return Scatter::ABSORBED;
    }

    Scatter {
        weight: albedo * (FRAC_1_PI / pdf),
        incident,
    }
}

fn scatter_fresnel<R: Rng + ?Sized>(
    eta: f32,
    tint: Color,
    outgoing: Vec3,
    normal: Vec3,
    rng: &mut R,
) -> Scatter {
    let cos_o = outgoing.dot(normal);
    let eta = if cos_o < 0.0 { 1.0 / eta } else { eta };

    let cos_i = fresnel_cos_i(eta, cos_o);
    let reflectance = fresnel_value(eta, cos_o, cos_i);

    // Branch chosen with probability equal to its Fresnel weight, so the two cancel
    let incident = if gen_f32(rng) < reflectance {
        normalize(reflect(outgoing, normal))
    } else {
        fresnel_refract(eta, cos_i, outgoing, normal)
    };

    specular(tint, incident, normal)
}

/// Weight for a delta lobe: cancels the cosine the integrator applies.
#[inline]
fn specular(tint: Color, incident: Vec3, normal: Vec3) -> Scatter {
    let correction = abs_dot(incident, normal);
    if almost_zero(correction) {
        return Scatter::ABSORBED;
    }

    Scatter {
        weight: tint / correction,
        incident,
    }
}

/// Cosine of the transmitted direction, by Snell's law.
///
/// Returns `0.0` on total internal reflection. The sign is opposite to
/// `cos_o`, since transmission crosses to the other side of the surface.
pub fn fresnel_cos_i(eta: f32, cos_o: f32) -> f32 {
    let sin_o2 = 1.0 - cos_o * cos_o;
    let sin_i2 = eta * eta * sin_o2;
    if sin_i2 >= 1.0 {
        return 0.0;
    }

    let cos_i = safe_sqrt(1.0 - sin_i2);
    if cos_o > 0.0 {
        -cos_i
    } else {
        cos_i
    }
}

/// Unpolarized Fresnel reflectance of a smooth dielectric.
///
/// Averages the parallel and perpendicular terms. A zero transmitted cosine
/// means total internal reflection and yields `1.0`.
pub fn fresnel_value(eta: f32, cos_o: f32, cos_i: f32) -> f32 {
    if almost_zero(cos_i) {
        return 1.0;
    }

    let cos_o = cos_o.abs();
    let cos_i = cos_i.abs();

    let para0 = cos_o * eta;
    let para1 = cos_i;
    let perp0 = cos_o;
    let perp1 = cos_i * eta;

    let para = (para0 - para1) / (para0 + para1);
    let perp = (perp0 - perp1) / (perp0 + perp1);
    (para * para + perp * perp) / 2.0
}

/// Transmitted direction through a dielectric surface.
pub fn fresnel_refract(eta: f32, cos_i: f32, outgoing: Vec3, normal: Vec3) -> Vec3 {
    let cos_o = outgoing.dot(normal);
    normalize(normal * (eta * cos_o + cos_i) - outgoing * eta)
}

/// Fixed palette mapping [`MaterialId`]s to materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    /// Create a table; index `i` in `materials` becomes `MaterialId(i)`.
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    /// Single grey diffuse material, scattering 80% per bounce.
    pub fn basic() -> Self {
        Self::new(vec![Material::lambertian(Color::splat(0.4))])
    }

    /// Diffuse, mirror, glass and light, in id order 0 to 3.
    pub fn reference() -> Self {
        Self::new(vec![
            Material::lambertian(Color::splat(0.25)),
            Material::Mirror {
                tint: Color::splat(0.8),
            },
            Material::Fresnel {
                eta: 1.0 / 1.5,
                tint: Color::splat(0.9),
            },
            Material::Emissive {
                emission: Color::ONE,
            },
        ])
    }

    /// Switch every Lambertian entry to the given sampling strategy.
    pub fn with_diffuse_sampling(mut self, strategy: HemisphereSampling) -> Self {
        for material in &mut self.materials {
            if let Material::Lambertian { sampling, .. } = material {
                *sampling = strategy;
            }
        }
        self
    }

    /// Look up a material; unknown ids resolve to [`Material::Absorbing`].
    pub fn get(&self, id: MaterialId) -> &Material {
        self.materials.get(id.0 as usize).unwrap_or(&ABSORBING)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Monte-Carlo estimate of the directional albedo `E[weight * cos θ]`.
    fn estimate_albedo(material: &Material, outgoing: Vec3, normal: Vec3, samples: u32) -> Color {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            let scatter = material.scatter(outgoing, normal, &mut rng);
            sum += scatter.weight * abs_dot(scatter.incident, normal);
        }
        sum / samples as f32
    }

    #[test]
    fn test_lambertian_uniform_converges_to_albedo() {
        let albedo = Color::new(0.25, 0.5, 0.75);
        let material = Material::lambertian(albedo);
        let outgoing = normalize(Vec3::new(0.3, 1.0, -0.2));

        let estimate = estimate_albedo(&material, outgoing, Vec3::Y, 200_000);
        assert!(
            (estimate - albedo).abs().max_element() < 0.01,
            "estimate {estimate:?} should match albedo {albedo:?}"
        );
    }

    #[test]
    fn test_lambertian_cosine_converges_to_albedo() {
        let albedo = Color::splat(0.6);
        let material = Material::Lambertian {
            albedo,
            sampling: HemisphereSampling::Cosine,
        };
        let outgoing = normalize(Vec3::new(-0.5, 0.4, 0.1));

        let estimate = estimate_albedo(&material, outgoing, Vec3::Y, 100_000);
        assert!(
            (estimate - albedo).abs().max_element() < 0.01,
            "estimate {estimate:?} should match albedo {albedo:?}"
        );
    }

    #[test]
    fn test_lambertian_stays_on_viewer_side() {
        let mut rng = StdRng::seed_from_u64(11);
        let normal = Vec3::Y;

        for sampling in [HemisphereSampling::Uniform, HemisphereSampling::Cosine] {
            let material = Material::Lambertian {
                albedo: Color::ONE,
                sampling,
            };
            for outgoing in [Vec3::Y, -Vec3::Y] {
                for _ in 0..1000 {
                    let scatter = material.scatter(outgoing, normal, &mut rng);
                    if !scatter.is_absorbed() {
                        assert!(scatter.incident.dot(normal) * outgoing.dot(normal) >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_mirror_reflects_with_cosine_correction() {
        let mut rng = StdRng::seed_from_u64(0);
        let material = Material::Mirror {
            tint: Color::splat(0.8),
        };
        let outgoing = normalize(Vec3::new(1.0, 1.0, 0.0));

        let scatter = material.scatter(outgoing, Vec3::Y, &mut rng);
        assert!((scatter.incident - normalize(Vec3::new(-1.0, 1.0, 0.0))).length() < 1e-6);

        // weight * cos θ recovers the tint exactly
        let throughput = scatter.weight * abs_dot(scatter.incident, Vec3::Y);
        assert!((throughput - Color::splat(0.8)).length() < 1e-5);
    }

    #[test]
    fn test_mirror_grazing_is_absorbed() {
        let mut rng = StdRng::seed_from_u64(0);
        let material = Material::Mirror { tint: Color::ONE };

        let scatter = material.scatter(Vec3::X, Vec3::Y, &mut rng);
        assert!(scatter.is_absorbed());
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        for eta in [1.0 / 1.5, 1.5, 1.33, 2.4] {
            let cos_i = fresnel_cos_i(eta, 1.0);
            let reflectance = fresnel_value(eta, 1.0, cos_i);
            let expected = ((1.0 - eta) / (1.0 + eta)).powi(2);
            assert!(
                (reflectance - expected).abs() < 1e-6,
                "eta={eta}: {reflectance} vs {expected}"
            );
        }
    }

    #[test]
    fn test_fresnel_total_internal_reflection() {
        // Leaving a dense medium at a grazing angle
        let eta = 1.5;
        let cos_o = 0.2;
        let cos_i = fresnel_cos_i(eta, cos_o);
        assert_eq!(cos_i, 0.0);
        assert_eq!(fresnel_value(eta, cos_o, cos_i), 1.0);

        // Every sample must then reflect
        let mut rng = StdRng::seed_from_u64(5);
        let material = Material::Fresnel { eta, tint: Color::ONE };
        let outgoing = normalize(Vec3::new((1.0 - cos_o * cos_o).sqrt(), cos_o, 0.0));
        for _ in 0..100 {
            let scatter = material.scatter(outgoing, Vec3::Y, &mut rng);
            assert!(scatter.incident.y > 0.0);
        }
    }

    #[test]
    fn test_fresnel_refraction_obeys_snell() {
        let eta = 1.0 / 1.5;
        let outgoing = normalize(Vec3::new(0.6, 0.8, 0.0));
        let cos_o = outgoing.dot(Vec3::Y);

        let cos_i = fresnel_cos_i(eta, cos_o);
        let refracted = fresnel_refract(eta, cos_i, outgoing, Vec3::Y);

        assert!((refracted.length() - 1.0).abs() < 1e-5);
        assert!(refracted.y < 0.0, "transmission crosses the surface");
        let sin_o = (1.0 - cos_o * cos_o).sqrt();
        let sin_t = (1.0 - refracted.y * refracted.y).sqrt();
        assert!((sin_t - eta * sin_o).abs() < 1e-5);
    }

    /// Fraction of glass samples that stay on the outgoing side of the surface.
    fn reflected_fraction(eta: f32, outgoing: Vec3, samples: u32) -> f32 {
        let glass = Material::Fresnel {
            eta,
            tint: Color::ONE,
        };
        let normal = Vec3::Y;
        let mut rng = StdRng::seed_from_u64(21);

        let mut reflected = 0;
        for _ in 0..samples {
            let scatter = glass.scatter(outgoing, normal, &mut rng);
            assert!(!scatter.is_absorbed());
            if scatter.incident.dot(normal) * outgoing.dot(normal) > 0.0 {
                reflected += 1;
            }
        }
        reflected as f32 / samples as f32
    }

    #[test]
    fn test_fresnel_reflects_with_fresnel_probability() {
        let eta = 1.0 / 1.5;

        // Oblique, arriving from outside
        let outgoing = normalize(Vec3::new(0.98, 0.2, 0.0));
        let cos_o = outgoing.dot(Vec3::Y);
        let expected = fresnel_value(eta, cos_o, fresnel_cos_i(eta, cos_o));
        let fraction = reflected_fraction(eta, outgoing, 40_000);
        assert!(expected > 0.1 && expected < 0.9);
        assert!((fraction - expected).abs() < 0.015, "outside: {fraction} vs {expected}");

        // Oblique, arriving from inside below the critical angle
        let outgoing = normalize(Vec3::new(0.6, -0.8, 0.0));
        let cos_o = outgoing.dot(Vec3::Y);
        let inner_eta = 1.0 / eta;
        let expected = fresnel_value(inner_eta, cos_o, fresnel_cos_i(inner_eta, cos_o));
        let fraction = reflected_fraction(eta, outgoing, 40_000);
        assert!(expected > 0.0 && expected < 0.5);
        assert!((fraction - expected).abs() < 0.015, "inside: {fraction} vs {expected}");
    }

    #[test]
    fn test_fresnel_straight_through_at_normal_incidence() {
        let refracted = fresnel_refract(1.0 / 1.5, fresnel_cos_i(1.0 / 1.5, 1.0), Vec3::Y, Vec3::Y);
        assert!((refracted + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_emissive_and_absorbing() {
        let mut rng = StdRng::seed_from_u64(0);
        let light = Material::Emissive {
            emission: Color::splat(2.0),
        };
        assert_eq!(light.emitted(), Color::splat(2.0));
        assert!(light.scatter(Vec3::Y, Vec3::Y, &mut rng).is_absorbed());

        assert_eq!(Material::Absorbing.emitted(), Color::ZERO);
        assert!(Material::Absorbing.scatter(Vec3::Y, Vec3::Y, &mut rng).is_absorbed());
    }

    #[test]
    fn test_unknown_id_is_absorbing() {
        let table = MaterialTable::reference();
        assert_eq!(table.len(), 4);
        assert_eq!(*table.get(MaterialId(99)), Material::Absorbing);
        assert_eq!(*table.get(MaterialId(3)), Material::Emissive { emission: Color::ONE });
        assert_eq!(*MaterialTable::default().get(MaterialId::DEFAULT), Material::Absorbing);
    }

    #[test]
    fn test_with_diffuse_sampling() {
        let table = MaterialTable::reference().with_diffuse_sampling(HemisphereSampling::Cosine);
        assert!(matches!(
            table.get(MaterialId(0)),
            Material::Lambertian {
                sampling: HemisphereSampling::Cosine,
                ..
            }
        ));
        assert!(matches!(table.get(MaterialId(2)), Material::Fresnel { .. }));
    }

    #[test]
    fn test_basic_diffuse_weight() {
        // Uniform sampling doubles the albedo: 0.4 / π / (1 / 2π) = 0.8
        let mut rng = StdRng::seed_from_u64(9);
        let scatter = MaterialTable::basic()
            .get(MaterialId::DEFAULT)
            .scatter(Vec3::Y, Vec3::Y, &mut rng);
        assert!((scatter.weight - Color::splat(0.8)).length() < 1e-5);
    }
}
