//! Image output.
//!
//! Converts the linear render buffer to an 8-bit PNG: each channel is
//! clamped to [0, 1], gamma corrected with a square root and quantized.
//! The sampler stores row 0 at the bottom of the picture, so rows are flipped
//! on the way out.

use crate::material::Color;
use crate::renderer::ImageBuffer;
use image::{Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Cannot write an empty {width}x{height} image")]
    Empty { width: u32, height: u32 },
}

/// Apply gamma correction (gamma = 2.0) after clamping to [0, 1].
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    linear.clamp(0.0, 1.0).sqrt()
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let convert = |value: f32| (linear_to_gamma(value) * 255.0) as u8;
    [convert(color.x), convert(color.y), convert(color.z)]
}

/// Convert a render buffer into an 8-bit image, flipping it vertically.
pub fn to_rgb8(buffer: &ImageBuffer) -> RgbImage {
    let height = buffer.height;
    RgbImage::from_fn(buffer.width, height, |x, y| {
        Rgb(color_to_rgb(buffer.get(x, height - y - 1)))
    })
}

/// Write a render buffer as a PNG file.
pub fn write_png(path: impl AsRef<Path>, buffer: &ImageBuffer) -> Result<(), OutputError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(OutputError::Empty {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let path = path.as_ref();
    to_rgb8(buffer).save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Saved {}x{} image to {}", buffer.width, buffer.height, path.display());
    Ok(())
}
