//! Scene construction and nearest-hit queries.
//!
//! Scenes are assembled with a [`SceneBuilder`] and frozen into an immutable
//! [`Scene`] before rendering starts. A frozen scene is only ever read, so the
//! render workers share it by reference without locking.

use crate::material::MaterialId;
use crate::primitive::{AxisBox, Intersect, Intersection, Plane, Sphere};
use sable_math::{Ray, Vec3};

/// A primitive paired with the material it is shaded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tagged<T> {
    pub shape: T,
    pub material: MaterialId,
}

impl<T: Intersect> Tagged<T> {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Intersection {
        self.shape.intersect(ray)
    }
}

/// Nearest intersection of a ray against a whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Travel distance along the ray, `+inf` if nothing was hit
    pub distance: f32,
    /// Outward unit normal of the hit primitive
    pub normal: Vec3,
    /// Material of the hit primitive
    pub material: MaterialId,
}

impl SceneHit {
    const MISS: SceneHit = SceneHit {
        distance: f32::INFINITY,
        normal: Vec3::ZERO,
        material: MaterialId::DEFAULT,
    };

    /// Whether anything was hit.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }

    /// Replace this record if `candidate` is strictly closer.
    #[inline]
    fn offer(&mut self, candidate: Intersection, material: MaterialId) {
        if candidate.distance < self.distance {
            self.distance = candidate.distance;
            self.normal = candidate.normal;
            self.material = material;
        }
    }
}

/// Mutable collection of primitives, consumed by [`SceneBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    spheres: Vec<Tagged<Sphere>>,
    planes: Vec<Tagged<Plane>>,
    boxes: Vec<Tagged<AxisBox>>,
}

impl SceneBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere.
    pub fn insert_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) -> &mut Self {
        self.spheres.push(Tagged {
            shape: Sphere::new(center, radius),
            material,
        });
        self
    }

    /// Add a plane `dot(p, normal) + offset = 0`.
    pub fn insert_plane(&mut self, normal: Vec3, offset: f32, material: MaterialId) -> &mut Self {
        self.planes.push(Tagged {
            shape: Plane::new(normal, offset),
            material,
        });
        self
    }

    /// Add an axis-aligned box spanning `center ∓ size / 2`.
    pub fn insert_box(&mut self, center: Vec3, size: Vec3, material: MaterialId) -> &mut Self {
        self.boxes.push(Tagged {
            shape: AxisBox::from_center_size(center, size),
            material,
        });
        self
    }

    /// Add a sphere with the default material.
    pub fn sphere(&mut self, center: Vec3, radius: f32) -> &mut Self {
        self.insert_sphere(center, radius, MaterialId::DEFAULT)
    }

    /// Add a plane with the default material.
    pub fn plane(&mut self, normal: Vec3, offset: f32) -> &mut Self {
        self.insert_plane(normal, offset, MaterialId::DEFAULT)
    }

    /// Add a box with the default material.
    pub fn cuboid(&mut self, center: Vec3, size: Vec3) -> &mut Self {
        self.insert_box(center, size, MaterialId::DEFAULT)
    }

    /// Freeze the builder into a read-only scene.
    pub fn build(self) -> Scene {
        log::debug!(
            "Scene built: {} spheres, {} planes, {} boxes",
            self.spheres.len(),
            self.planes.len(),
            self.boxes.len()
        );

        Scene {
            spheres: self.spheres,
            planes: self.planes,
            boxes: self.boxes,
        }
    }
}

/// Immutable scene, safe to share across render workers.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Tagged<Sphere>>,
    planes: Vec<Tagged<Plane>>,
    boxes: Vec<Tagged<AxisBox>>,
}

impl Scene {
    /// Start building a new scene.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// Find the nearest primitive along `ray`.
    ///
    /// Scans spheres, then planes, then boxes, each in insertion order. Only a
    /// strictly closer hit replaces the current one, so on exact ties the
    /// primitive seen first wins. On a miss the distance stays `+inf`.
    pub fn nearest(&self, ray: &Ray) -> SceneHit {
        let mut best = SceneHit::MISS;

        for sphere in &self.spheres {
            best.offer(sphere.intersect(ray), sphere.material);
        }

        for plane in &self.planes {
            best.offer(plane.intersect(ray), plane.material);
        }

        for cuboid in &self.boxes {
            best.offer(cuboid.intersect(ray), cuboid.material);
        }

        best
    }

    /// Find the nearest primitive along `ray`, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<SceneHit> {
        let hit = self.nearest(ray);
        hit.is_hit().then_some(hit)
    }

    pub fn spheres(&self) -> &[Tagged<Sphere>] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Tagged<Plane>] {
        &self.planes
    }

    pub fn boxes(&self) -> &[Tagged<AxisBox>] {
        &self.boxes
    }

    /// Total number of primitives.
    pub fn len(&self) -> usize {
        self.spheres.len() + self.planes.len() + self.boxes.len()
    }

    /// Check if the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
