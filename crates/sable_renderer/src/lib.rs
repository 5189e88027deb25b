//! Sable - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a small set of implicit primitives
//! (spheres, planes, axis-aligned boxes) and a closed set of materials
//! (diffuse, mirror, glass, emitter).
//!
//! Scenes are built once with [`SceneBuilder`], frozen into a [`Scene`] and
//! then shared read-only by every render worker.

mod camera;
mod integrator;
mod material;
mod output;
mod parallel;
mod presets;
mod primitive;
mod renderer;
mod sampling;
mod scene;

pub use camera::Camera;
pub use integrator::{is_invalid, luminance, Background, Integrator, Termination, MAX_PATH_VERTICES};
pub use material::{
    fresnel_cos_i, fresnel_refract, fresnel_value, Color, HemisphereSampling, Material, MaterialId,
    MaterialTable, Scatter,
};
pub use output::{color_to_rgb, linear_to_gamma, to_rgb8, write_png, OutputError};
pub use parallel::{parallel_rows, resolve_workers, ParallelError};
pub use presets::{Preset, PresetKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use primitive::{AxisBox, Intersect, Intersection, Plane, Sphere};
pub use renderer::{render, render_pixel, Averaging, ImageBuffer, RenderConfig, RenderError};
pub use sampling::{gen_f32, random_in_sphere, random_on_sphere};
pub use scene::{Scene, SceneBuilder, SceneHit, Tagged};

/// Re-export Vec3 and common math types from sable_math
pub use sable_math::{Ray, Vec3};
