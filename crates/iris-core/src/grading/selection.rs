//! Legacy hand-painted selection layer.
//!
//! Predates the mask stack: the layer carries its own RGBA brush bytes at
//! image size, and mask strength per pixel is
//! `max(R, A) / 255 × opacity`. Where strength is positive the pixel's HSL is
//! shifted:
//!
//! ```text
//!   h += hue × s        (wrapped)
//!   s += saturation × s (clamped 0..100)
//!   l += brightness × s × 0.5
//! ```
//!
//! With the overlay shown, selected pixels also get a red tint so the
//! painted area is visible while editing.

use crate::color::{hsl_to_rgb, rgb_to_hsl, sanitize};
use crate::image::{CHANNELS, Raster};
use crate::params::layer::{SelectionAdjustments, SelectionMode};

/// Red added on top of an adjusted pixel while the overlay is shown.
const ADJUSTED_TINT: f32 = 40.0;
/// Red added when the overlay is the only thing to draw.
const OVERLAY_TINT: f32 = 80.0;
/// Green/blue attenuation at full strength in overlay-only mode.
const OVERLAY_DIM: f32 = 0.2;

/// Apply a legacy selection in place.
///
/// `show_overlay` should already account for whether this layer is the
/// selected one. Color-mode selections and missing or mis-sized brush data
/// leave the raster untouched.
pub fn apply_selection_layer(
    raster: &mut Raster,
    selection: &SelectionAdjustments,
    opacity: f32,
    show_overlay: bool,
) {
    if selection.mask_mode != SelectionMode::Brush {
        return;
    }
    let Some(mask) = selection.mask_data.as_deref() else {
        return;
    };
    if mask.len() != raster.as_bytes().len() {
        tracing::warn!(
            expected = raster.as_bytes().len(),
            actual = mask.len(),
            "selection mask does not match the image, skipping"
        );
        return;
    }

    let has_adjustments = selection.has_adjustments();
    if !has_adjustments && !show_overlay {
        return;
    }

    let hue = sanitize(selection.local_hue, -180.0, 180.0, 0.0);
    let sat = sanitize(selection.local_saturation, -100.0, 100.0, 0.0);
    let bright = sanitize(selection.local_brightness, -100.0, 100.0, 0.0);

    for (px, m) in raster.pixels_mut().iter_mut().zip(mask.chunks_exact(CHANNELS)) {
        let raw = m[0].max(m[3]);
        if raw == 0 {
            continue;
        }
        let strength = raw as f32 / 255.0 * opacity;
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);

        if has_adjustments {
            let hsl = rgb_to_hsl(r, g, b);
            let rgb = hsl_to_rgb(
                hsl.h + hue * strength,
                (hsl.s + sat * strength).clamp(0.0, 100.0),
                (hsl.l + bright * strength * 0.5).clamp(0.0, 100.0),
            );
            px[0] = if show_overlay {
                (rgb[0] as f32 + ADJUSTED_TINT * strength).min(255.0).round() as u8
            } else {
                rgb[0]
            };
            px[1] = rgb[1];
            px[2] = rgb[2];
        } else {
            px[0] = (r + OVERLAY_TINT * strength).min(255.0).round() as u8;
            px[1] = (g * (1.0 - strength * OVERLAY_DIM)).round() as u8;
            px[2] = (b * (1.0 - strength * OVERLAY_DIM)).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brush_selection(mask: Vec<u8>) -> SelectionAdjustments {
        SelectionAdjustments {
            mask_mode: SelectionMode::Brush,
            mask_data: Some(mask),
            ..Default::default()
        }
    }

    /// Left pixel painted, right pixel untouched.
    fn half_mask() -> Vec<u8> {
        vec![255, 0, 0, 255, 0, 0, 0, 0]
    }

    #[test]
    fn test_color_mode_is_noop() {
        let mut raster = Raster::filled(2, 1, [10, 20, 30, 255]);
        let sel = SelectionAdjustments {
            local_hue: 90.0,
            mask_data: Some(half_mask()),
            ..Default::default()
        };
        apply_selection_layer(&mut raster, &sel, 1.0, true);
        assert_eq!(raster, Raster::filled(2, 1, [10, 20, 30, 255]));
    }

    #[test]
    fn test_mismatched_mask_is_noop() {
        let mut raster = Raster::filled(2, 2, [10, 20, 30, 255]);
        let mut sel = brush_selection(half_mask());
        sel.local_hue = 90.0;
        apply_selection_layer(&mut raster, &sel, 1.0, false);
        assert_eq!(raster, Raster::filled(2, 2, [10, 20, 30, 255]));
    }

    #[test]
    fn test_hue_shift_only_where_painted() {
        let mut raster = Raster::filled(2, 1, [255, 0, 0, 255]);
        let mut sel = brush_selection(half_mask());
        sel.local_hue = 120.0;
        apply_selection_layer(&mut raster, &sel, 1.0, false);
        assert_eq!(raster.pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_overlay_only_tints_red() {
        let mut raster = Raster::filled(2, 1, [100, 100, 100, 255]);
        let sel = brush_selection(half_mask());
        apply_selection_layer(&mut raster, &sel, 1.0, true);
        assert_eq!(raster.pixel(0, 0), [180, 80, 80, 255]);
        assert_eq!(raster.pixel(1, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn test_overlay_hidden_without_adjustments_is_noop() {
        let mut raster = Raster::filled(2, 1, [100, 100, 100, 255]);
        apply_selection_layer(&mut raster, &brush_selection(half_mask()), 1.0, false);
        assert_eq!(raster, Raster::filled(2, 1, [100, 100, 100, 255]));
    }

    #[test]
    fn test_adjusted_pixels_get_overlay_tint() {
        let mut raster = Raster::filled(2, 1, [100, 100, 100, 255]);
        let mut sel = brush_selection(half_mask());
        sel.local_brightness = 0.001;
        apply_selection_layer(&mut raster, &sel, 1.0, true);
        assert_eq!(raster.pixel(0, 0), [140, 100, 100, 255]);
    }

    #[test]
    fn test_alpha_channel_counts_as_paint() {
        let mut raster = Raster::filled(1, 1, [100, 100, 100, 255]);
        let sel = brush_selection(vec![0, 0, 0, 255]);
        apply_selection_layer(&mut raster, &sel, 0.5, true);
        // strength 0.5: R + 40, G/B × 0.9.
        assert_eq!(raster.pixel(0, 0), [140, 90, 90, 255]);
    }
}
