//! Color layer: primary sliders followed by three-zone color balance.
//!
//! # Per-pixel chain (0–255 scale)
//! ```text
//!   rgb ──→ ×exposure ──→ contrast(128) ──→ saturation(luma)
//!       ──→ temperature ──→ tint ──→ balance(zones) ──→ hue ──→ blend(opacity)
//! ```
//!
//! Percentage sliders pivot on 100 and are clamped to `[0, 200]`.

use crate::color::{self, hsl_to_rgb, rgb_to_hsl, sanitize};
use crate::image::{Raster, to_channel};
use crate::params::layer::{ColorAdjustments, ColorBalance};

/// Temperature and tint move channels by this many levels per unit.
const SHIFT_SCALE: f32 = 0.3;

/// Contrast pivot on the 0–255 scale.
const MID_GRAY: f32 = 128.0;

/// Adjustments with every field clamped to a usable range.
fn sanitized(adj: &ColorAdjustments) -> ColorAdjustments {
    ColorAdjustments {
        exposure: sanitize(adj.exposure, 0.0, 200.0, 100.0),
        contrast: sanitize(adj.contrast, 0.0, 200.0, 100.0),
        saturation: sanitize(adj.saturation, 0.0, 200.0, 100.0),
        temperature: sanitize(adj.temperature, -100.0, 100.0, 0.0),
        tint: sanitize(adj.tint, -100.0, 100.0, 0.0),
        hue: sanitize(adj.hue, -180.0, 180.0, 0.0),
    }
}

/// Apply the primary sliders to one pixel. Output is unclamped.
pub fn apply_primaries(rgb: [f32; 3], adj: &ColorAdjustments) -> [f32; 3] {
    let exposure = adj.exposure / 100.0;
    let contrast = adj.contrast / 100.0;
    let saturation = adj.saturation / 100.0;

    let mut out = rgb.map(|v| v * exposure);
    out = out.map(|v| (v - MID_GRAY) * contrast + MID_GRAY);

    let gray = color::luma(out);
    out = out.map(|v| gray + (v - gray) * saturation);

    out[0] += adj.temperature * SHIFT_SCALE;
    out[2] -= adj.temperature * SHIFT_SCALE;
    out[1] -= adj.tint * SHIFT_SCALE;
    out
}

/// Zone weights `(shadow, mid, highlight)` for relative luma `l` in `[0, 1]`.
///
/// ```text
///   shadow    = (1 − L)²
///   midtone   = 1 − |L − 0.5| × 2
///   highlight = L²
/// ```
pub fn zone_weights(l: f32) -> (f32, f32, f32) {
    let l = l.clamp(0.0, 1.0);
    let shadow = (1.0 - l) * (1.0 - l);
    let mid = 1.0 - (l - 0.5).abs() * 2.0;
    let high = l * l;
    (shadow, mid, high)
}

/// Add each zone's RGB shift, weighted by the pixel's luma, at half strength.
pub fn apply_balance(rgb: [f32; 3], balance: &ColorBalance) -> [f32; 3] {
    let l = color::relative_luma(rgb.map(|v| v.clamp(0.0, 255.0)));
    let (ws, wm, wh) = zone_weights(l);
    let shadows = balance.shadows.as_array();
    let midtones = balance.midtones.as_array();
    let highlights = balance.highlights.as_array();

    let mut out = rgb;
    for c in 0..3 {
        let shift = sanitize(shadows[c], -100.0, 100.0, 0.0) * ws
            + sanitize(midtones[c], -100.0, 100.0, 0.0) * wm
            + sanitize(highlights[c], -100.0, 100.0, 0.0) * wh;
        out[c] += shift * 0.5;
    }
    out
}

/// Rotate hue by `degrees` through an HSL round trip.
fn rotate_hue(rgb: [f32; 3], degrees: f32) -> [f32; 3] {
    let clamped = rgb.map(|v| v.clamp(0.0, 255.0));
    let hsl = rgb_to_hsl(clamped[0], clamped[1], clamped[2]);
    hsl_to_rgb(hsl.h + degrees, hsl.s, hsl.l).map(f32::from)
}

fn balance_is_neutral(balance: &ColorBalance) -> bool {
    *balance == ColorBalance::default()
}

/// Apply a color layer to `raster` in place, blended by `opacity`.
pub fn apply_color_layer(
    raster: &mut Raster,
    adjustments: &ColorAdjustments,
    balance: &ColorBalance,
    opacity: f32,
) {
    let adj = sanitized(adjustments);
    let skip_balance = balance_is_neutral(balance);

    for px in raster.pixels_mut() {
        let orig = [px[0] as f32, px[1] as f32, px[2] as f32];
        let mut adjusted = apply_primaries(orig, &adj);
        if !skip_balance {
            adjusted = apply_balance(adjusted, balance);
        }
        if adj.hue != 0.0 {
            adjusted = rotate_hue(adjusted, adj.hue);
        }
        for c in 0..3 {
            px[c] = to_channel(orig[c] + (adjusted[c] - orig[c]) * opacity);
        }
    }
}
