//! Pinhole camera for primary ray generation.

use sable_math::{normalize, Ray, Vec3};

/// Pinhole camera with an image plane one unit in front of the eye.
///
/// Pixel coordinates are mapped around the image center and divided by the
/// image width on both axes, so pixels stay square and the horizontal field
/// of view is fixed at `2 * atan(0.5)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl Camera {
    /// Create a camera at `(0, 1, -3)` looking down `+z`.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            eye: Vec3::new(0.0, 1.0, -3.0),
            right: Vec3::X,
            up: Vec3::Y,
            forward: Vec3::Z,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Move the eye without changing the viewing direction.
    pub fn with_eye(mut self, eye: Vec3) -> Self {
        self.eye = eye;
        self
    }

    /// Set camera position and orientation.
    ///
    /// A degenerate setup (look_at on top of the eye, or `vup` parallel to the
    /// view direction) leaves the orientation unchanged.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.eye = look_from;

        let forward = normalize(look_at - look_from);
        let right = normalize(vup.cross(forward));
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            log::warn!("Degenerate camera orientation, keeping previous basis");
            return self;
        }

        self.forward = forward;
        self.right = right;
        self.up = forward.cross(right);
        self
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Ray through the point `(x + jitter_x, y + jitter_y)` in pixel space.
    ///
    /// Jitter values are expected in `[0, 1)`. Larger `y` maps higher in the
    /// scene.
    pub fn ray_for(&self, x: u32, y: u32, jitter_x: f32, jitter_y: f32) -> Ray {
        let width = self.image_width as f32;
        let height = self.image_height as f32;

        let u = (x as f32 + jitter_x - width / 2.0) / width;
        let v = (y as f32 + jitter_y - height / 2.0) / width;

        let direction = normalize(self.right * u + self.up * v + self.forward);
        Ray::new(self.eye, direction)
    }
}
