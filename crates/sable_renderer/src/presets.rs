//! Built-in scenes.
//!
//! Two fixed setups ship with the renderer:
//!
//! - **basic**: three grey diffuse spheres on a diffuse ground, lit only by
//!   the background, with energy-based path termination.
//! - **reference**: diffuse ground, a mirror sphere, a glass sphere, a glass
//!   slab and a small light, with a fixed bounce budget.

use crate::integrator::Termination;
use crate::material::{MaterialId, MaterialTable};
use crate::renderer::{Averaging, RenderConfig};
use crate::scene::{Scene, SceneBuilder};
use crate::Camera;
use sable_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default output resolution for both presets.
pub const DEFAULT_WIDTH: u32 = 1920 / 2;
pub const DEFAULT_HEIGHT: u32 = 1080 / 2;

/// Which built-in scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    #[default]
    Basic,
    Reference,
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetKind::Basic => write!(f, "basic"),
            PresetKind::Reference => write!(f, "reference"),
        }
    }
}

impl FromStr for PresetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(PresetKind::Basic),
            "reference" => Ok(PresetKind::Reference),
            other => Err(format!("unknown preset '{other}' (expected basic or reference)")),
        }
    }
}

/// A complete renderable setup.
#[derive(Debug, Clone)]
pub struct Preset {
    pub kind: PresetKind,
    pub scene: Scene,
    pub materials: MaterialTable,
    pub camera: Camera,
    pub config: RenderConfig,
}

impl Preset {
    /// Build the preset of the given kind.
    pub fn new(kind: PresetKind) -> Self {
        match kind {
            PresetKind::Basic => Self::basic(),
            PresetKind::Reference => Self::reference(),
        }
    }

    /// Three diffuse spheres on a diffuse ground plane.
    pub fn basic() -> Self {
        let mut builder = SceneBuilder::new();
        builder
            .sphere(Vec3::new(0.0, 1.0, 3.0), 1.0)
            .sphere(Vec3::new(-2.0, 1.0, 3.0), 1.0)
            .sphere(Vec3::new(0.0, 3.0, 3.0), 1.0)
            .plane(Vec3::Y, 0.0);

        Self {
            kind: PresetKind::Basic,
            scene: builder.build(),
            materials: MaterialTable::basic(),
            camera: Camera::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            config: RenderConfig::default()
                .with_samples(64)
                .with_termination(Termination::Energy { cutoff: 0.01 })
                .with_averaging(Averaging::AllSamples),
        }
    }

    /// Mixed materials with a small light above the glass sphere.
    pub fn reference() -> Self {
        const DIFFUSE: MaterialId = MaterialId(0);
        const MIRROR: MaterialId = MaterialId(1);
        const GLASS: MaterialId = MaterialId(2);
        const LIGHT: MaterialId = MaterialId(3);

        let mut builder = SceneBuilder::new();
        builder
            .insert_sphere(Vec3::new(0.0, 1.0, 3.0), 1.0, GLASS)
            .insert_sphere(Vec3::new(-2.0, 1.0, 3.0), 1.0, MIRROR)
            .insert_sphere(Vec3::new(0.0, 3.0, 3.0), 0.3, LIGHT)
            .insert_plane(Vec3::Y, 0.0, DIFFUSE)
            .insert_box(Vec3::new(2.0, 1.1, 3.0), Vec3::new(2.0, 2.0, 0.5), GLASS);

        Self {
            kind: PresetKind::Reference,
            scene: builder.build(),
            materials: MaterialTable::reference(),
            camera: Camera::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).with_eye(Vec3::new(0.0, 1.5, -3.0)),
            config: RenderConfig::default()
                .with_samples(640)
                .with_termination(Termination::Depth { max_bounces: 128 })
                .with_averaging(Averaging::ValidSamples),
        }
    }
}
