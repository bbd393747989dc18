//! The two-pass compositor.
//!
//! ```text
//!   source ──clone──→ working
//!                       │  pass 1: global layers, stored order
//!                       │  pass 2: active mask layers, ascending `order`
//!                       │          alpha = process_mask(mask, working)
//!                       │          working = apply_local(working, alpha)
//!                       ↓
//!                     output
//! ```
//!
//! Pass 2 generates each alpha map against the working raster as it stands,
//! so a color-range mask sees the edits of the mask layers before it.

use std::panic::{self, AssertUnwindSafe};

use crate::config::RenderOptions;
use crate::grading;
use crate::image::{Raster, RasterError};
use crate::mask;
use crate::params::layer::Layer;
use crate::params::mask::{Mask, MaskLayer};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid source raster: {0}")]
    InvalidRaster(#[from] RasterError),
    #[error("render aborted: {0}")]
    Aborted(String),
}

/// Mask layers that take part in a render, sorted by `order`. Ties keep
/// their stored order.
pub fn active_mask_layers(mask_layers: &[MaskLayer]) -> Vec<&MaskLayer> {
    let mut active: Vec<&MaskLayer> = mask_layers.iter().filter(|l| l.is_active()).collect();
    active.sort_by_key(|l| l.mask.order);
    active
}

/// Run both passes without any failure handling.
pub fn composite(
    source: &Raster,
    layers: &[Layer],
    mask_layers: &[MaskLayer],
    options: &RenderOptions,
) -> Raster {
    let mut working = source.clone();
    let mut rng = options.grain_rng();

    for layer in layers {
        grading::apply_layer(&mut working, layer, options, &mut rng);
    }

    for mask_layer in active_mask_layers(mask_layers) {
        if mask_layer.adjustments.sanitized().is_neutral() {
            tracing::debug!(layer = %mask_layer.id, "mask layer has no adjustments, skipping");
            continue;
        }
        let alpha = mask::process_mask(&mask_layer.mask, Some(&working), working.dimensions());
        working = grading::apply_local_adjustments(&working, &alpha, &mask_layer.adjustments);
    }

    working
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Composite with failure isolation: a panic anywhere in the run becomes
/// `RenderError::Aborted` and no partial frame escapes.
pub fn render(
    source: &Raster,
    layers: &[Layer],
    mask_layers: &[MaskLayer],
    options: &RenderOptions,
) -> Result<Raster, RenderError> {
    tracing::debug!(
        size = %source.dimensions(),
        layers = layers.len(),
        mask_layers = mask_layers.len(),
        "render started"
    );
    guarded(|| composite(source, layers, mask_layers, options))
}

/// Run `compose`, turning a panic into `RenderError::Aborted`.
fn guarded(compose: impl FnOnce() -> Raster) -> Result<Raster, RenderError> {
    panic::catch_unwind(AssertUnwindSafe(compose))
        .map_err(|payload| RenderError::Aborted(panic_message(payload.as_ref())))
}

/// `result`, or an untouched copy of `source` when it failed.
fn or_source(result: Result<Raster, RenderError>, source: &Raster) -> Raster {
    result.unwrap_or_else(|e| {
        tracing::error!("render failed, showing the source image: {e}");
        source.clone()
    })
}

/// Render raw RGBA bytes. The output has the same dimensions as the input.
pub fn render_bytes(
    rgba: &[u8],
    width: u32,
    height: u32,
    layers: &[Layer],
    mask_layers: &[MaskLayer],
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    let source = Raster::from_rgba(width, height, rgba.to_vec())?;
    render(&source, layers, mask_layers, options).map(Raster::into_bytes)
}

/// Render, falling back to an untouched copy of `source` on failure.
pub fn render_or_source(
    source: &Raster,
    layers: &[Layer],
    mask_layers: &[MaskLayer],
    options: &RenderOptions,
) -> Raster {
    or_source(render(source, layers, mask_layers, options), source)
}

/// Refined alpha of `mask` against `raster`, painted in the mask's preview
/// color.
pub fn mask_overlay(raster: &Raster, mask: &Mask) -> Raster {
    let alpha = mask::process_mask(mask, Some(raster), raster.dimensions());
    mask::render_overlay(&alpha, &mask.preview_color)
}
