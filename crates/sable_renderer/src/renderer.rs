//! Pixel sampling and whole-image rendering.
//!
//! Each pixel fires `samples_per_pixel` jittered camera rays through the
//! [`Integrator`] and averages the results. Samples that come back as NaN or
//! infinity are discarded instead of being folded into the average.

use crate::integrator::{is_invalid, Background, Integrator, Termination};
use crate::material::{Color, MaterialTable};
use crate::parallel::{parallel_rows, resolve_workers, ParallelError};
use crate::sampling::gen_f32;
use crate::{Camera, Scene};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur during a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Parallel setup failed: {0}")]
    Parallel(#[from] ParallelError),
}

/// How a pixel's samples are turned into its final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Averaging {
    /// Divide by the number of valid samples; all-invalid pixels are black.
    #[default]
    ValidSamples,
    /// Divide by the full sample count; invalid samples count as black.
    AllSamples,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Path termination policy
    pub termination: Termination,
    /// Light from rays that leave the scene
    pub background: Background,
    /// Per-pixel averaging policy
    pub averaging: Averaging,
    /// Worker threads, 0 for one per hardware thread
    pub workers: usize,
    /// Base seed; worker `i` uses `seed + i`
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            termination: Termination::default(),
            background: Background::default(),
            averaging: Averaging::default(),
            workers: 0,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Set samples per pixel.
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    /// Set the termination policy.
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Set the averaging policy.
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    /// Set worker count and base seed.
    pub fn with_workers(mut self, workers: usize, seed: u64) -> Self {
        self.workers = workers;
        self.seed = seed;
        self
    }

    /// Build an integrator for this configuration.
    pub fn integrator<'a>(&self, scene: &'a Scene, materials: &'a MaterialTable) -> Integrator<'a> {
        Integrator::new(scene, materials)
            .with_termination(self.termination)
            .with_background(self.background)
    }
}

/// Accumulated samples of one pixel.
#[derive(Debug, Clone, Copy, Default)]
struct PixelEstimate {
    sum: Color,
    valid: u32,
    discarded: u32,
}

impl PixelEstimate {
    fn add(&mut self, sample: Color) {
        if is_invalid(sample) {
            self.discarded += 1;
        } else {
            self.sum += sample;
            self.valid += 1;
        }
    }

    fn resolve(&self, averaging: Averaging) -> Color {
        let count = match averaging {
            Averaging::ValidSamples => self.valid,
            Averaging::AllSamples => self.valid + self.discarded,
        };

        if count == 0 {
            Color::ZERO
        } else {
            self.sum / count as f32
        }
    }
}

fn estimate_pixel<R: Rng + ?Sized>(
    camera: &Camera,
    integrator: &Integrator,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut R,
) -> PixelEstimate {
    let mut estimate = PixelEstimate::default();

    for _ in 0..config.samples_per_pixel {
        let jitter_x = gen_f32(rng);
        let jitter_y = gen_f32(rng);
        let ray = camera.ray_for(x, y, jitter_x, jitter_y);
        estimate.add(integrator.trace(&ray, rng));
    }

    estimate
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel<R: Rng + ?Sized>(
    camera: &Camera,
    integrator: &Integrator,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut R,
) -> Color {
    estimate_pixel(camera, integrator, x, y, config, rng).resolve(config.averaging)
}

/// Linear-light image in sampler order: row 0 is the lowest `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Pixels of row `y`, left to right.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    fn row_mut(&mut self, y: u32) -> &mut [Color] {
        let start = self.index(0, y);
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene to an image buffer using a pool of workers.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    materials: &MaterialTable,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    let width = camera.image_width;
    let height = camera.image_height;
    let integrator = config.integrator(scene, materials);

    log::info!(
        "Rendering {}x{} @ {} spp on {} workers ({} primitives)",
        width,
        height,
        config.samples_per_pixel,
        resolve_workers(config.workers, height),
        scene.len()
    );
    let start = Instant::now();

    let rows = parallel_rows(height, config.workers, config.seed, |y, rng| {
        let mut discarded = 0;
        let pixels: Vec<Color> = (0..width)
            .map(|x| {
                let estimate = estimate_pixel(camera, &integrator, x, y, config, rng);
                discarded += estimate.discarded;
                estimate.resolve(config.averaging)
            })
            .collect();
        (pixels, discarded)
    })?;

    let mut image = ImageBuffer::new(width, height);
    let mut discarded = 0u64;
    for (y, (pixels, row_discarded)) in rows {
        image.row_mut(y).copy_from_slice(&pixels);
        discarded += u64::from(row_discarded);
    }

    if discarded > 0 {
        log::warn!("Discarded {} invalid samples", discarded);
    }
    log::info!("Rendered in {:?}", start.elapsed());

    Ok(image)
}
