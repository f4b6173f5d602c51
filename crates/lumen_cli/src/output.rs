//! Writing rendered images to disk.

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageFormat, ImageResult, RgbImage};
use lumen_renderer::PixelBuffer;
use std::path::Path;

/// Convert a pixel buffer to an `image` RGB image.
pub fn to_rgb_image(buffer: &PixelBuffer) -> ImageResult<RgbImage> {
    RgbImage::from_raw(buffer.width(), buffer.height(), buffer.to_rgb_bytes()).ok_or_else(|| {
        ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        ))
    })
}

/// Save `buffer` to `path`. The format follows the extension: `.png`, or
/// `.ppm` for a binary PPM.
pub fn save(buffer: &PixelBuffer, path: &Path) -> ImageResult<()> {
    let format = ImageFormat::from_path(path)?;
    to_rgb_image(buffer)?.save_with_format(path, format)?;
    log::info!("Image saved as {} ({:?})", path.display(), format);
    Ok(())
}
