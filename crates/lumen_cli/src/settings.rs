//! Render settings: built-in defaults, an optional JSON file, then
//! command line flags, each layer overriding the previous one.

use crate::cli::Args;
use crate::scenes::SceneKind;
use lumen_renderer::CameraSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cartoonize levels must be between 1 and 256, got {0}")]
    InvalidCartoonLevels(u32),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Everything one invocation needs besides the scene geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub scene: SceneKind,
    pub output: PathBuf,
    /// Seeds both the scene layout and the pixel samples
    pub seed: u64,
    pub blur: bool,
    pub cartoonize: Option<u32>,
    /// Let the scene pick the viewpoint (position, field of view, aspect
    /// ratio, backgrounds). Resolution, samples and cores always come from
    /// `camera`.
    pub scene_camera: bool,
    #[serde(flatten)]
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scene: SceneKind::Spheres,
            output: PathBuf::from("output.png"),
            seed: 0,
            blur: false,
            cartoonize: None,
            scene_camera: true,
            camera: CameraSettings::default().with_cores(default_cores()),
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> SettingsResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
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

    /// Resolve the settings for one run: the `--config` file if given,
    /// then every flag that was set.
    pub fn resolve(args: &Args) -> SettingsResult<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_args(args);
        settings.validate()?;
        Ok(settings)
    }

    /// Override fields with the flags present on the command line.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(scene) = args.scene {
            self.scene = scene;
        }
        if let Some(width) = args.width {
            self.camera.image_width = width;
        }
        if let Some(rays) = args.rays {
            self.camera.rays_per_pixel = rays;
        }
        if let Some(cores) = args.cores {
            self.camera.cores = cores;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        if args.blur {
            self.blur = true;
        }
        if let Some(levels) = args.cartoonize {
            self.cartoonize = Some(levels);
        }
    }

    fn validate(&self) -> SettingsResult<()> {
        match self.cartoonize {
            Some(levels) if !(1..=256).contains(&levels) => {
                Err(SettingsError::InvalidCartoonLevels(levels))
            }
            _ => Ok(()),
        }
    }
}

fn default_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
