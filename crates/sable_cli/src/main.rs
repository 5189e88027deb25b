mod cli;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use log::LevelFilter;
use sable_renderer::{render, write_png, Preset, PresetKind};
use settings::Settings;

/// Initialize the logger; `RUST_LOG` is still honoured for per-module filters.
fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let kind = PresetKind::from(args.preset);
    let mut preset = Preset::new(kind);

    let file = match &args.config {
        Some(path) => {
            log::info!("Loading settings from {}", path.display());
            Settings::load(path)?
        }
        None => Settings::default(),
    };
    let settings = file.merge(Settings::from_args(&args));
    settings.apply(&mut preset);

    log::info!("Preset: {}", kind);
    log::debug!("Render config: {:?}", preset.config);

    let image = render(&preset.camera, &preset.scene, &preset.materials, &preset.config)
        .context("Render failed")?;

    let output = settings.output_path();
    write_png(&output, &image)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}
