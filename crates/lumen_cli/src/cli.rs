use crate::scenes::SceneKind;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels accepted by `--log-level`
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

/// Command line arguments.
///
/// Every render option is optional here: unset flags fall back to the
/// settings file, then to the built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "A Monte Carlo path tracer over spheres and quads")]
pub struct Args {
    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Demo scene to render
    #[arg(long, value_enum)]
    pub scene: Option<SceneKind>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub rays: Option<u32>,

    /// Render threads (defaults to the available parallelism)
    #[arg(long)]
    pub cores: Option<usize>,

    /// Seed for scene layout and pixel sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file; the extension picks the format (.png or .ppm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Apply a 3x3 box blur before saving
    #[arg(long)]
    pub blur: bool,

    /// Quantize each channel to this many levels before saving
    #[arg(long, value_name = "LEVELS")]
    pub cartoonize: Option<u32>,
}
