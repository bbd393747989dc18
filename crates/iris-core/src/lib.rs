//! Iris Core — non-destructive layer compositing and masking.
//!
//! A render starts from an immutable RGBA source, applies the global layer
//! stack in order, then each active mask layer's local adjustments through
//! its refined alpha map. No GPU or framework dependencies.

pub mod color;
pub mod config;
pub mod grading;
pub mod image;
pub mod mask;
pub mod params;
pub mod pipeline;
pub mod scopes;
pub mod stack;
pub mod transform;

// Re-exports for convenience.
pub use config::RenderOptions;
pub use image::{Dimensions, Raster, RasterError};
pub use mask::{AlphaMap, process_mask};
pub use params::{Layer, LayerAdjustments, LayerKind, LocalAdjustments, Mask, MaskLayer};
pub use pipeline::{Frame, RenderError, RenderScheduler, render, render_bytes, render_or_source};
pub use stack::{LayerStack, MaskStack, StackError};
