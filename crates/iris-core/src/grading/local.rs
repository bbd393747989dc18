//! Local adjustments gated by a mask's alpha map.
//!
//! # Per-pixel chain (0–255 scale)
//! ```text
//!   rgb ──→ ×2^(exposure/50) ──→ contrast(128) ──→ temperature
//!       ──→ shadows (1−L)² ──→ highlights L² ──→ hue/saturation (HSL)
//!       ──→ + sharpen ──→ blend(alpha)
//! ```
//!
//! The alpha map already carries the mask's opacity, so it is the only blend
//! weight.

use crate::color::{self, hsl_to_rgb, rgb_to_hsl};
use crate::image::{Raster, to_channel};
use crate::mask::AlphaMap;
use crate::params::local::LocalAdjustments;

/// Pixels whose weight is below this are left alone.
pub const ALPHA_EPSILON: f32 = 0.001;

/// Adjust one pixel with every color operation at full strength.
pub fn adjust_pixel(rgb: [f32; 3], adj: &LocalAdjustments) -> [f32; 3] {
    let [mut r, mut g, mut b] = rgb;

    if adj.exposure != 0.0 {
        let factor = 2.0_f32.powf(adj.exposure / 50.0);
        r = (r * factor).min(255.0);
        g = (g * factor).min(255.0);
        b = (b * factor).min(255.0);
    }

    if adj.contrast != 0.0 {
        let factor = (100.0 + adj.contrast) / 100.0;
        r = 128.0 + (r - 128.0) * factor;
        g = 128.0 + (g - 128.0) * factor;
        b = 128.0 + (b - 128.0) * factor;
    }

    if adj.temperature != 0.0 {
        let shift = adj.temperature * 0.5;
        r = (r + shift).clamp(0.0, 255.0);
        b = (b - shift).clamp(0.0, 255.0);
    }

    if adj.shadows != 0.0 || adj.highlights != 0.0 {
        let l = color::relative_luma([r, g, b].map(|v| v.clamp(0.0, 255.0)));
        let shift = adj.shadows * (1.0 - l) * (1.0 - l) * 0.5;
        if adj.shadows != 0.0 {
            r = (r + shift).clamp(0.0, 255.0);
            g = (g + shift).clamp(0.0, 255.0);
            b = (b + shift).clamp(0.0, 255.0);
        }
        let shift = adj.highlights * l * l * 0.5;
        if adj.highlights != 0.0 {
            r = (r + shift).clamp(0.0, 255.0);
            g = (g + shift).clamp(0.0, 255.0);
            b = (b + shift).clamp(0.0, 255.0);
        }
    }

    if adj.hue != 0.0 || adj.saturation != 0.0 {
        let hsl = rgb_to_hsl(r.clamp(0.0, 255.0), g.clamp(0.0, 255.0), b.clamp(0.0, 255.0));
        let s = (hsl.s + adj.saturation).clamp(0.0, 100.0);
        [r, g, b] = hsl_to_rgb(hsl.h + adj.hue, s, hsl.l).map(f32::from);
    }

    [r, g, b]
}

/// Cross-shaped high-pass of `src` at `(x, y)`, edge-clamped.
fn high_pass(src: &Raster, x: u32, y: u32) -> [f32; 3] {
    let (w, h) = (src.width(), src.height());
    let center = src.pixel(x, y);
    let neighbours = [
        src.pixel(x.saturating_sub(1), y),
        src.pixel((x + 1).min(w - 1), y),
        src.pixel(x, y.saturating_sub(1)),
        src.pixel(x, (y + 1).min(h - 1)),
    ];
    [0, 1, 2].map(|c| {
        let ring: f32 = neighbours.iter().map(|n| n[c] as f32).sum();
        4.0 * center[c] as f32 - ring
    })
}

/// Return a copy of `source` with `adjustments` blended in by `alpha`.
///
/// A neutral record, or an alpha map of the wrong size, returns an identical
/// copy.
pub fn apply_local_adjustments(
    source: &Raster,
    alpha: &AlphaMap,
    adjustments: &LocalAdjustments,
) -> Raster {
    let mut out = source.clone();
    let adj = adjustments.sanitized();
    if adj.is_neutral() {
        return out;
    }
    if alpha.dimensions() != source.dimensions() {
        tracing::warn!(
            raster = %source.dimensions(),
            alpha = %alpha.dimensions(),
            "alpha map does not match the raster, skipping local adjustments"
        );
        return out;
    }

    let width = source.width();
    let color_ops = adj.has_color_adjustments();
    let sharpen = adj.sharpness / 100.0;

    for (i, (px, &a)) in out.pixels_mut().iter_mut().zip(alpha.values()).enumerate() {
        if a.is_nan() || a < ALPHA_EPSILON {
            continue;
        }
        let a = a.min(1.0);
        let orig = [px[0] as f32, px[1] as f32, px[2] as f32];
        let mut adjusted = if color_ops { adjust_pixel(orig, &adj) } else { orig };

        if sharpen > 0.0 {
            let detail = high_pass(source, i as u32 % width, i as u32 / width);
            for c in 0..3 {
                adjusted[c] += detail[c] * sharpen;
            }
        }

        for c in 0..3 {
            px[c] = to_channel(orig[c] + (adjusted[c] - orig[c]) * a);
        }
    }
    out
}
