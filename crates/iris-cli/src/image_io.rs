//! Image loading and saving for the renderer.

use std::path::Path;

use iris_core::Raster;

/// Errors that can occur during image I/O.
#[derive(Debug, thiserror::Error)]
pub enum ImageIoError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("raster buffer does not match its dimensions")]
    Geometry,
}

/// Load an image from disk as 8-bit RGBA.
///
/// Any format the `image` crate can decode is accepted; higher bit depths
/// are quantized to 8 bits per channel.
pub fn load_image(path: &Path) -> Result<Raster, ImageIoError> {
    let img = image::open(path).map_err(ImageIoError::Decode)?;
    let raster = Raster::from_rgba_image(img.to_rgba8());
    tracing::info!(path = %path.display(), size = %raster.dimensions(), "loaded image");
    Ok(raster)
}

/// Save a raster. The format is chosen from the file extension.
pub fn save_image(path: &Path, raster: Raster) -> Result<(), ImageIoError> {
    let img = raster.into_rgba_image().ok_or(ImageIoError::Geometry)?;
    img.save(path).map_err(ImageIoError::Encode)?;
    tracing::info!(path = %path.display(), "wrote image");
    Ok(())
}
