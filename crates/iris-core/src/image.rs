//! Raster representation for the compositing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// Errors raised when a byte buffer does not describe a valid raster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("raster dimensions {width}x{height} overflow the address space")]
    TooLarge { width: u32, height: u32 },
    #[error("expected {expected} bytes for a {width}x{height} RGBA raster, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by these dimensions.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Smaller of the two sides, as a float.
    pub fn min_side(self) -> f32 {
        self.width.min(self.height) as f32
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Straight (non-premultiplied) RGBA8 raster, row-major, no padding.
///
/// This is the working buffer of the compositor. Every pipeline run clones the
/// immutable source into a fresh `Raster` and mutates only that copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    dims: Dimensions,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an RGBA byte buffer, validating its length against the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(RasterError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dims: Dimensions::new(width, height),
            data,
        })
    }

    /// A raster filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self {
            dims: Dimensions::new(width, height),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixel view over the byte buffer.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels()[self.index(x, y)]
    }

    /// Linear pixel index of `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.dims.width as usize + x as usize
    }

    /// Convert from an `image` crate buffer.
    pub fn from_rgba_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            dims: Dimensions::new(width, height),
            data: image.into_raw(),
        }
    }

    /// Convert into an `image` crate buffer.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.dims.width, self.dims.height, self.data)
    }
}

fn expected_len(width: u32, height: u32) -> Result<usize, RasterError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(RasterError::TooLarge { width, height })
}

/// Round and saturate a channel value into a byte. `NaN` maps to 0.
pub fn to_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round() as u8
}
