use crate::Vec3;

/// Distance a bounced ray's origin is pushed along its new direction.
///
/// Keeps the new ray from immediately re-hitting the surface it left
/// (shadow acne).
pub const BOUNCE_OFFSET: f32 = 1e-4;

/// A ray in 3D space with origin and direction.
///
/// The direction is not required to be unit length. Intersection routines
/// report distances in units of `direction`, so `at(t)` always lands on the hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Continue a path from the point at `distance` along this ray.
    ///
    /// The new origin is offset by [`BOUNCE_OFFSET`] along `direction`.
    #[inline]
    pub fn bounce(&self, distance: f32, direction: Vec3) -> Ray {
        let point = self.at(distance) + direction * BOUNCE_OFFSET;
        Ray::new(point, direction)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin(), origin);
        assert_eq!(ray.direction(), direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_bounce_offsets_along_new_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let bounced = ray.bounce(2.0, Vec3::Y);

        assert_eq!(bounced.direction(), Vec3::Y);
        assert!((bounced.origin() - Vec3::new(0.0, BOUNCE_OFFSET, 2.0)).length() < 1e-7);
    }

    #[test]
    fn test_default_ray_points_forward() {
        let ray = Ray::default();
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert_eq!(ray.direction(), Vec3::Z);
    }
}
