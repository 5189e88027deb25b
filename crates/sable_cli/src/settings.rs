//! JSON render settings.
//!
//! Every field is optional. A settings file is layered over the chosen preset,
//! and command line flags are layered over the file.

use crate::cli::Args;
use sable_renderer::{Averaging, Background, HemisphereSampling, Preset, Termination};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output path used when neither the file nor the flags name one.
pub const DEFAULT_OUTPUT: &str = "sable.png";

/// Errors that can occur while loading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Overrides for a preset's camera, render configuration and materials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub workers: Option<usize>,
    pub seed: Option<u64>,
    pub averaging: Option<Averaging>,
    pub termination: Option<Termination>,
    pub background: Option<Background>,
    pub diffuse_sampling: Option<HemisphereSampling>,
    pub output: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The overrides given as command line flags.
    pub fn from_args(args: &Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            samples_per_pixel: args.samples,
            workers: args.workers,
            seed: args.seed,
            averaging: args.averaging.map(Averaging::from),
            output: args.output.clone(),
            ..Self::default()
        }
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: Settings) -> Self {
        Self {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            samples_per_pixel: other.samples_per_pixel.or(self.samples_per_pixel),
            workers: other.workers.or(self.workers),
            seed: other.seed.or(self.seed),
            averaging: other.averaging.or(self.averaging),
            termination: other.termination.or(self.termination),
            background: other.background.or(self.background),
            diffuse_sampling: other.diffuse_sampling.or(self.diffuse_sampling),
            output: other.output.or(self.output),
        }
    }

    /// Apply the overrides to a preset.
    pub fn apply(&self, preset: &mut Preset) {
        let camera = &mut preset.camera;
        let width = self.width.unwrap_or(camera.image_width);
        let height = self.height.unwrap_or(camera.image_height);
        *camera = camera.with_resolution(width, height);

        let config = &mut preset.config;
        if let Some(samples) = self.samples_per_pixel {
            config.samples_per_pixel = samples;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(averaging) = self.averaging {
            config.averaging = averaging;
        }
        if let Some(termination) = self.termination {
            config.termination = termination;
        }
        if let Some(background) = self.background {
            config.background = background;
        }

        if let Some(sampling) = self.diffuse_sampling {
            preset.materials = std::mem::take(&mut preset.materials).with_diffuse_sampling(sampling);
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}
