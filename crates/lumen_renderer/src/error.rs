//! Error types for scene setup and rendering.

use thiserror::Error;

/// Invalid camera, material or shape parameters.
///
/// These are reported when the offending value is constructed, never in the
/// middle of a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image width must be at least one pixel")]
    InvalidImageWidth,

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),

    #[error("rays per pixel must be at least 1")]
    InvalidRaysPerPixel,

    #[error("core count must be at least 1")]
    InvalidCores,

    #[error("image width {width} with aspect ratio {aspect_ratio} gives a zero image height")]
    DegenerateImageHeight { width: u32, aspect_ratio: f64 },

    #[error("image width {width} with aspect ratio {aspect_ratio} exceeds {max} pixels")]
    ImageTooLarge {
        width: u32,
        aspect_ratio: f64,
        max: usize,
    },

    #[error("camera basis is degenerate: {0}")]
    DegenerateCameraBasis(&'static str),

    #[error("material weight `{name}` must be non-negative and finite, got {value}")]
    InvalidMaterialWeight { name: &'static str, value: f64 },

    #[error("material weights sum to zero")]
    DegenerateMaterial,

    #[error("color components must be non-negative and finite, got ({0}, {1}, {2})")]
    InvalidColor(f64, f64, f64),

    #[error("frame size {frame_size} does not fit inside a quad with sides {side1} and {side2}")]
    InvalidFrameSize {
        frame_size: f64,
        side1: f64,
        side2: f64,
    },
}

/// Errors returned by [`crate::render`].
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to start render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;
