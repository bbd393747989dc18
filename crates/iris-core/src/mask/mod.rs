//! Alpha-map generation for the six mask types, plus refinement and preview.
//!
//! ```text
//!   Mask ──→ generate (per shape) ──→ refine ──→ AlphaMap
//!                ↑
//!        working raster (color range only)
//! ```

pub mod alpha;
pub mod brush;
pub mod color_range;
pub mod overlay;
pub mod refine;
pub mod shapes;

pub use alpha::AlphaMap;
pub use brush::{BrushBitmap, BrushDecodeError};
pub use overlay::render_overlay;
pub use refine::refine;

use crate::image::{Dimensions, Raster};
use crate::params::mask::{Mask, MaskShape};

/// Raw, unrefined alpha for `mask` at `dims`.
///
/// Only color-range masks read `source`; without one they select nothing.
pub fn generate(mask: &Mask, source: Option<&Raster>, dims: Dimensions) -> AlphaMap {
    match &mask.shape {
        MaskShape::ColorRange(settings) => match source {
            Some(raster) if raster.dimensions() == dims => {
                color_range::color_range(raster, settings)
            }
            _ => AlphaMap::zeros(dims),
        },
        MaskShape::Circular(settings) => shapes::circular(dims, settings),
        MaskShape::Elliptical(settings) => shapes::elliptical(dims, settings),
        MaskShape::Rectangular(settings) => shapes::rectangular(dims, settings),
        MaskShape::Linear(settings) => shapes::linear(dims, settings),
        MaskShape::Brush(settings) => match &settings.bitmap {
            Some(bitmap) => bitmap.to_alpha_map(dims),
            None => AlphaMap::zeros(dims),
        },
    }
}

/// Generate and refine: the alpha map that gates a mask layer's adjustments.
pub fn process_mask(mask: &Mask, source: Option<&Raster>, dims: Dimensions) -> AlphaMap {
    let mut alpha = generate(mask, source, dims);
    refine(&mut alpha, &mask.refinement, &mask.global);
    tracing::debug!(mask = %mask.id, kind = ?mask.mask_type(), "mask processed");
    alpha
}
