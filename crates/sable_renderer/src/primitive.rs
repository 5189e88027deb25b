//! Implicit primitives and their closed-form ray intersections.
//!
//! Every routine reports the smallest non-negative distance along the ray
//! (in units of the ray's direction vector) and the outward unit normal at
//! that point, or [`Intersection::MISS`] when there is nothing in front of
//! the ray. Misses are a sentinel rather than an `Option` so the scene can
//! keep a running minimum with plain comparisons.

use sable_math::{almost_zero, normalize, Ray, Vec3};

/// Result of intersecting a ray with a single primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Travel distance along the ray, `+inf` on a miss
    pub distance: f32,
    /// Outward unit normal at the hit point (zero on a miss)
    pub normal: Vec3,
}

impl Intersection {
    /// The "no hit" sentinel.
    pub const MISS: Intersection = Intersection {
        distance: f32::INFINITY,
        normal: Vec3::ZERO,
    };

    #[inline]
    fn hit(distance: f32, normal: Vec3) -> Self {
        Self { distance, normal }
    }

    /// Whether this records an actual hit.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Trait for shapes that can be intersected by rays.
pub trait Intersect: Send + Sync {
    /// Find the nearest non-negative intersection along `ray`.
    fn intersect(&self, ray: &Ray) -> Intersection;
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray) -> Intersection {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if almost_zero(a) {
            return Intersection::MISS;
        }

        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return Intersection::MISS;
        }

        let sqrtd = discriminant.sqrt();

        // Near root first; fall back to the far root when the origin is inside
        let mut root = (h - sqrtd) / a;
        if root < 0.0 {
            root = (h + sqrtd) / a;
            if root < 0.0 {
                return Intersection::MISS;
            }
        }

        let normal = normalize(ray.at(root) - self.center);
        Intersection::hit(root, normal)
    }
}

/// An infinite plane satisfying `dot(p, normal) + offset = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    /// Create a plane, rescaling so the stored normal is unit length.
    ///
    /// A degenerate normal yields a plane that is never hit.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        let length = normal.length();
        if almost_zero(length * length) {
            return Self {
                normal: Vec3::ZERO,
                offset: 0.0,
            };
        }

        Self {
            normal: normal / length,
            offset: offset / length,
        }
    }
}

impl Intersect for Plane {
    fn intersect(&self, ray: &Ray) -> Intersection {
        let mapped = ray.direction().dot(self.normal);

        // Parallel rays never reach the plane
        if almost_zero(mapped) {
            return Intersection::MISS;
        }

        let distance = -(ray.origin().dot(self.normal) + self.offset) / mapped;
        if distance >= 0.0 {
            // Single-sided at this stage; materials sort out which side is lit
            Intersection::hit(distance, self.normal)
        } else {
            Intersection::MISS
        }
    }
}

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl AxisBox {
    /// Create a box from two opposite corners in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box from its center and full edge lengths.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let extend = size.abs() / 2.0;
        Self {
            min: center - extend,
            max: center + extend,
        }
    }

    /// Unit normal along `axis`, pointing with `sign`.
    #[inline]
    fn axis_normal(axis: usize, sign: f32) -> Vec3 {
        let mut normal = Vec3::ZERO;
        normal[axis] = sign;
        normal
    }
}

impl Intersect for AxisBox {
    /// Slab method, tracking which axis produced the entry and exit distances.
    ///
    /// From outside, the hit is the entry face and its normal faces the ray
    /// origin. From inside, the hit is the exit face and its normal faces away.
    fn intersect(&self, ray: &Ray) -> Intersection {
        let origin = ray.origin();
        let direction = ray.direction();

        let mut entry = f32::NEG_INFINITY;
        let mut entry_axis = 0;
        let mut exit = f32::INFINITY;
        let mut exit_axis = 0;

        for axis in 0..3 {
            let inv = 1.0 / direction[axis];
            let mut near = (self.min[axis] - origin[axis]) * inv;
            let mut far = (self.max[axis] - origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }

            // Strict comparisons: earlier axes win ties, NaN slabs are skipped
            if near > entry {
                entry = near;
                entry_axis = axis;
            }
            if far < exit {
                exit = far;
                exit_axis = axis;
            }
        }

        if exit < entry || exit < 0.0 {
            return Intersection::MISS;
        }

        let (distance, normal) = if entry >= 0.0 {
            let sign = -(1.0_f32.copysign(direction[entry_axis]));
            (entry, Self::axis_normal(entry_axis, sign))
        } else {
            let sign = 1.0_f32.copysign(direction[exit_axis]);
            (exit, Self::axis_normal(exit_axis, sign))
        };

        if !distance.is_finite() {
            return Intersection::MISS;
        }

        Intersection::hit(distance, normal)
    }
}
