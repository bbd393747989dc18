//! Global layer compositing and mask-gated local adjustments.
//!
//! Every strategy mutates the working raster in place and leaves the alpha
//! channel alone.

pub mod color;
pub mod curves;
pub mod effects;
pub mod local;
pub mod selection;

pub use local::apply_local_adjustments;

use rand::Rng;

use crate::config::RenderOptions;
use crate::image::Raster;
use crate::params::layer::{Layer, LayerAdjustments};

/// Apply one global layer. Hidden layers and layers with zero opacity are
/// skipped.
pub fn apply_layer(raster: &mut Raster, layer: &Layer, options: &RenderOptions, rng: &mut impl Rng) {
    let opacity = if layer.opacity.is_finite() {
        layer.opacity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if !layer.visible || opacity <= 0.0 {
        return;
    }
    tracing::debug!(layer = %layer.id, kind = layer.kind().label(), opacity, "applying layer");

    match &layer.adjustments {
        LayerAdjustments::Color { color, balance } => {
            color::apply_color_layer(raster, color, balance, opacity);
        }
        LayerAdjustments::Curves(curves) => {
            curves::apply_curves_layer(raster, curves, opacity);
        }
        LayerAdjustments::Effects(effects) => {
            effects::apply_effects_layer(raster, effects, opacity, rng);
        }
        LayerAdjustments::Selection(sel) => {
            let show_overlay = options.show_mask_overlay && options.is_selected(&layer.id);
            selection::apply_selection_layer(raster, sel, opacity, show_overlay);
        }
    }
}
