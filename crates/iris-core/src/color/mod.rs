//! Color math shared by the layer compositor and the mask generators.

pub mod hsl;

pub use hsl::{Hsl, hsl_to_rgb, rgb_to_hsl};

/// Rec. 601 luma weights, applied to 0–255 channel values.
pub const LUMA_REC601: [f32; 3] = [0.299, 0.587, 0.114];

/// Rec. 601 luma of an RGB triplet, in the same scale as the input.
pub fn luma(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_REC601[0] + rgb[1] * LUMA_REC601[1] + rgb[2] * LUMA_REC601[2]
}

/// Luma normalized to `[0, 1]` for 0–255 inputs.
pub fn relative_luma(rgb: [f32; 3]) -> f32 {
    luma(rgb) / 255.0
}

/// Clamp `value` into `[min, max]`, substituting `fallback` for non-finite input.
pub fn sanitize(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
