use clap::{Parser, ValueEnum};
use log::LevelFilter;
use sable_renderer::{Averaging, PresetKind};
use std::path::PathBuf;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scene to start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Basic,
    Reference,
}

impl From<PresetArg> for PresetKind {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Basic => PresetKind::Basic,
            PresetArg::Reference => PresetKind::Reference,
        }
    }
}

/// Per-pixel averaging policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AveragingArg {
    /// Divide by the number of valid samples
    Valid,
    /// Divide by the full sample count
    All,
}

impl From<AveragingArg> for Averaging {
    fn from(averaging: AveragingArg) -> Self {
        match averaging {
            AveragingArg::Valid => Averaging::ValidSamples,
            AveragingArg::All => Averaging::AllSamples,
        }
    }
}

/// Command line arguments
///
/// Every render option is optional here: unset flags fall back to the
/// settings file, then to the preset.
#[derive(Debug, Parser)]
#[command(name = "sable")]
#[command(about = "A CPU path tracer for implicit surfaces", version)]
pub struct Args {
    /// Scene preset
    #[arg(short, long, value_enum, default_value = "basic")]
    pub preset: PresetArg,

    /// JSON settings file layered over the preset
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Worker threads, 0 for one per hardware thread
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// How invalid samples affect the pixel average
    #[arg(long, value_enum)]
    pub averaging: Option<AveragingArg>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sable"]).unwrap();
        assert_eq!(args.preset, PresetArg::Basic);
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(args.config.is_none());
        assert!(args.samples.is_none());
        assert!(args.output.is_none());
    }

    #[test]
    fn test_full_command_line() {
        let args = Args::try_parse_from([
            "sable",
            "--preset",
            "reference",
            "--width",
            "320",
            "--height",
            "200",
            "-s",
            "16",
            "--workers",
            "2",
            "--seed",
            "9",
            "--averaging",
            "all",
            "--config",
            "settings.json",
            "-o",
            "out.png",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(PresetKind::from(args.preset), PresetKind::Reference);
        assert_eq!((args.width, args.height), (Some(320), Some(200)));
        assert_eq!(args.samples, Some(16));
        assert_eq!(args.workers, Some(2));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.averaging.map(Averaging::from), Some(Averaging::AllSamples));
        assert_eq!(args.config, Some(PathBuf::from("settings.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_unknown_preset() {
        assert!(Args::try_parse_from(["sable", "--preset", "cornell"]).is_err());
    }
}
