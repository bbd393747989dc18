//! Translucent on-screen preview of a mask.

use palette::Srgb;

use crate::image::Raster;
use crate::mask::alpha::AlphaMap;

/// Preview opacity at full mask weight, out of 255.
pub const OVERLAY_MAX_ALPHA: f32 = 150.0;

/// Used when a preview color fails to parse.
pub const FALLBACK_PREVIEW_COLOR: [u8; 3] = [0xff, 0x6b, 0x6b];

/// Parse `#rrggbb` (or `#rgb`) into RGB bytes.
pub fn parse_preview_color(hex: &str) -> Option<[u8; 3]> {
    hex.trim()
        .parse::<Srgb<u8>>()
        .ok()
        .map(|c| [c.red, c.green, c.blue])
}

/// Paint the preview color with `alpha = round(a × 150)`.
pub fn render_overlay(alpha: &AlphaMap, preview_color: &str) -> Raster {
    let rgb = parse_preview_color(preview_color).unwrap_or_else(|| {
        tracing::warn!(preview_color, "invalid mask preview color, using fallback");
        FALLBACK_PREVIEW_COLOR
    });

    let dims = alpha.dimensions();
    let mut raster = Raster::filled(dims.width, dims.height, [rgb[0], rgb[1], rgb[2], 0]);
    for (px, a) in raster.pixels_mut().iter_mut().zip(alpha.values()) {
        px[3] = (a.clamp(0.0, 1.0) * OVERLAY_MAX_ALPHA).round() as u8;
    }
    raster
}
