//! Painted brush bitmaps and their binary encoding.
//!
//! The drawing UI hands the engine an RGBA bitmap; mask strength is
//! `max(R, A) / 255` so both "paint red" and "paint opaque" strokes register.
//!
//! # Blob layout
//! ```text
//! offset  size  field
//! 0       4     magic  b"IRBM"
//! 4       1     version (1)
//! 5       4     width  (u32, little endian)
//! 9       4     height (u32, little endian)
//! 13      w*h*4 RGBA bytes, row-major
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::image::{CHANNELS, Dimensions};
use crate::mask::alpha::AlphaMap;

const MAGIC: &[u8; 4] = b"IRBM";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrushDecodeError {
    #[error("brush blob is {0} bytes, shorter than its header")]
    Truncated(usize),
    #[error("brush blob has a bad magic number")]
    BadMagic,
    #[error("unsupported brush blob version {0}")]
    UnsupportedVersion(u8),
    #[error("brush bitmap {width}x{height} needs {expected} bytes, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("invalid base64 brush data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An RGBA brush bitmap at the resolution it was painted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl BrushBitmap {
    /// Wrap RGBA bytes, checking the length.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, BrushDecodeError> {
        let bitmap = Self {
            width,
            height,
            rgba,
        };
        bitmap.validate()?;
        Ok(bitmap)
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Serialize to the length-prefixed binary blob.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.rgba.len());
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.rgba);
        out
    }

    /// Parse a blob produced by [`BrushBitmap::encode`].
    pub fn decode(blob: &[u8]) -> Result<Self, BrushDecodeError> {
        if blob.len() < HEADER_LEN {
            return Err(BrushDecodeError::Truncated(blob.len()));
        }
        if &blob[0..4] != MAGIC {
            return Err(BrushDecodeError::BadMagic);
        }
        if blob[4] != VERSION {
            return Err(BrushDecodeError::UnsupportedVersion(blob[4]));
        }
        let width = u32::from_le_bytes([blob[5], blob[6], blob[7], blob[8]]);
        let height = u32::from_le_bytes([blob[9], blob[10], blob[11], blob[12]]);
        Self::new(width, height, blob[HEADER_LEN..].to_vec())
    }

    /// Import the older storage format: base64 of raw RGBA plus known dimensions.
    pub fn from_base64(data: &str, width: u32, height: u32) -> Result<Self, BrushDecodeError> {
        let rgba = STANDARD.decode(data.trim())?;
        Self::new(width, height, rgba)
    }

    /// Export in the older base64 storage format.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.rgba)
    }

    fn validate(&self) -> Result<(), BrushDecodeError> {
        let expected = self.dimensions().pixel_count() * CHANNELS;
        if self.rgba.len() != expected {
            return Err(BrushDecodeError::LengthMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: self.rgba.len(),
            });
        }
        Ok(())
    }

    /// Mask strength of source pixel `(x, y)` in `[0, 1]`.
    fn strength(&self, x: usize, y: usize) -> f32 {
        let idx = (y * self.width as usize + x) * CHANNELS;
        self.rgba[idx].max(self.rgba[idx + 3]) as f32 / 255.0
    }

    /// Alpha map at `target` size, bilinearly resampled when sizes differ.
    ///
    /// A malformed bitmap is logged and yields an all-zero map.
    pub fn to_alpha_map(&self, target: Dimensions) -> AlphaMap {
        if let Err(e) = self.validate() {
            tracing::warn!("brush mask ignored: {e}");
            return AlphaMap::zeros(target);
        }
        if self.dimensions().is_empty() || target.is_empty() {
            return AlphaMap::zeros(target);
        }

        if self.dimensions() == target {
            let values = (0..target.pixel_count())
                .map(|i| {
                    let px = &self.rgba[i * CHANNELS..(i + 1) * CHANNELS];
                    px[0].max(px[3]) as f32 / 255.0
                })
                .collect();
            return AlphaMap::from_values(target, values).unwrap_or_else(|| AlphaMap::zeros(target));
        }

        let sampler = BilinearSampler::new(self.dimensions(), target);
        AlphaMap::from_fn(target, |x, y| {
            let s = sampler.sample(x, y);
            s.blend(|sx, sy| self.strength(sx, sy))
        })
    }

    /// RGBA bitmap resampled to `target`, each channel interpolated bilinearly.
    pub fn resampled(&self, target: Dimensions) -> Result<Self, BrushDecodeError> {
        self.validate()?;
        if self.dimensions() == target {
            return Ok(self.clone());
        }
        if self.dimensions().is_empty() || target.is_empty() {
            return Self::new(
                target.width,
                target.height,
                vec![0; target.pixel_count() * CHANNELS],
            );
        }

        let sampler = BilinearSampler::new(self.dimensions(), target);
        let mut rgba = Vec::with_capacity(target.pixel_count() * CHANNELS);
        for y in 0..target.height {
            for x in 0..target.width {
                let s = sampler.sample(x, y);
                for c in 0..CHANNELS {
                    let v = s.blend(|sx, sy| {
                        self.rgba[(sy * self.width as usize + sx) * CHANNELS + c] as f32
                    });
                    rgba.push(v.round().clamp(0.0, 255.0) as u8);
                }
            }
        }
        Self::new(target.width, target.height, rgba)
    }
}

/// Decode a blob straight to an alpha map. Never fails: malformed input is
/// logged and produces an all-zero map.
pub fn decode_alpha(blob: &[u8], target: Dimensions) -> AlphaMap {
    match BrushBitmap::decode(blob) {
        Ok(bitmap) => bitmap.to_alpha_map(target),
        Err(e) => {
            tracing::warn!("failed to decode brush mask: {e}");
            AlphaMap::zeros(target)
        }
    }
}

/// Maps target pixels onto source coordinates by plain scale factors.
struct BilinearSampler {
    src_w: usize,
    src_h: usize,
    scale_x: f32,
    scale_y: f32,
}

struct Sample {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    fx: f32,
    fy: f32,
}

impl BilinearSampler {
    fn new(src: Dimensions, target: Dimensions) -> Self {
        Self {
            src_w: src.width as usize,
            src_h: src.height as usize,
            scale_x: src.width as f32 / target.width as f32,
            scale_y: src.height as f32 / target.height as f32,
        }
    }

    fn sample(&self, x: u32, y: u32) -> Sample {
        let sx = x as f32 * self.scale_x;
        let sy = y as f32 * self.scale_y;
        let x0 = (sx.floor() as usize).min(self.src_w - 1);
        let y0 = (sy.floor() as usize).min(self.src_h - 1);
        Sample {
            x0,
            y0,
            x1: (x0 + 1).min(self.src_w - 1),
            y1: (y0 + 1).min(self.src_h - 1),
            fx: sx - x0 as f32,
            fy: sy - y0 as f32,
        }
    }
}

impl Sample {
    fn blend(&self, value: impl Fn(usize, usize) -> f32) -> f32 {
        value(self.x0, self.y0) * (1.0 - self.fx) * (1.0 - self.fy)
            + value(self.x1, self.y0) * self.fx * (1.0 - self.fy)
            + value(self.x0, self.y1) * (1.0 - self.fx) * self.fy
            + value(self.x1, self.y1) * self.fx * self.fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn checker(width: u32, height: u32) -> BrushBitmap {
        let mut rgba = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let on = (x + y) % 2 == 0;
                rgba.extend_from_slice(if on { &[255, 0, 0, 0] } else { &[0, 0, 0, 0] });
            }
        }
        BrushBitmap::new(width, height, rgba).expect("valid bitmap")
    }

    #[test]
    fn test_blob_decode_restores_bitmap() {
        let bitmap = checker(3, 2);
        let blob = bitmap.encode();
        assert_eq!(blob.len(), HEADER_LEN + 24);
        assert_eq!(BrushBitmap::decode(&blob), Ok(bitmap));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(BrushBitmap::decode(&[1, 2, 3]), Err(BrushDecodeError::Truncated(3)));

        let mut blob = checker(2, 2).encode();
        blob[0] = b'X';
        assert_eq!(BrushBitmap::decode(&blob), Err(BrushDecodeError::BadMagic));

        let mut blob = checker(2, 2).encode();
        blob.pop();
        assert!(matches!(
            BrushBitmap::decode(&blob),
            Err(BrushDecodeError::LengthMismatch { expected: 16, actual: 15, .. })
        ));
    }

    #[test]
    fn test_strength_uses_red_or_alpha() {
        let bitmap = BrushBitmap::new(2, 1, vec![0, 0, 0, 128, 255, 0, 0, 10]).expect("valid");
        let alpha = bitmap.to_alpha_map(Dimensions::new(2, 1));
        assert!((alpha.values()[0] - 128.0 / 255.0).abs() < EPSILON);
        assert!((alpha.values()[1] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_upsampling_interpolates() {
        // 2x1 source [0, 1] sampled at 4x1: x maps to 0, 0.5, 1, 1.5.
        let bitmap = BrushBitmap::new(2, 1, vec![0, 0, 0, 0, 255, 0, 0, 0]).expect("valid");
        let alpha = bitmap.to_alpha_map(Dimensions::new(4, 1));
        let expected = [0.0, 0.5, 1.0, 1.0];
        for (got, want) in alpha.values().iter().zip(expected) {
            assert!((got - want).abs() < EPSILON, "{:?}", alpha.values());
        }
    }

    #[test]
    fn test_malformed_bitmap_gives_zero_alpha() {
        let bitmap = BrushBitmap {
            width: 4,
            height: 4,
            rgba: vec![255; 7],
        };
        let alpha = bitmap.to_alpha_map(Dimensions::new(4, 4));
        assert!(alpha.values().iter().all(|&v| v == 0.0));

        let alpha = decode_alpha(b"garbage", Dimensions::new(3, 3));
        assert_eq!(alpha.values().len(), 9);
        assert!(alpha.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_base64_import_and_export() {
        let bitmap = checker(2, 2);
        let text = bitmap.to_base64();
        assert_eq!(BrushBitmap::from_base64(&text, 2, 2), Ok(bitmap));
        assert!(matches!(
            BrushBitmap::from_base64("!!not base64!!", 2, 2),
            Err(BrushDecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_resampled_same_size_is_clone() {
        let bitmap = checker(3, 3);
        assert_eq!(bitmap.resampled(Dimensions::new(3, 3)), Ok(bitmap));
    }

    #[test]
    fn test_resampled_downscale_dimensions() {
        let bitmap = checker(4, 4);
        let small = bitmap.resampled(Dimensions::new(2, 2)).expect("resample");
        assert_eq!(small.rgba.len(), 16);
        // Scale 2: target (0,0) samples source (0,0) exactly.
        assert_eq!(&small.rgba[0..4], &[255, 0, 0, 0]);
    }
}
