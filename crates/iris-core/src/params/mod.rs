//! Layer, mask and adjustment records.
//!
//! These are plain data. The stack module owns ordering and mutation rules;
//! the grading and mask modules read them during a render.

pub mod layer;
pub mod local;
pub mod mask;

pub use layer::{
    BrushTool, ColorAdjustments, ColorBalance, CurveAdjustments, EffectAdjustments, Layer,
    LayerAdjustments, LayerKind, SelectionAdjustments, SelectionMode, ZoneShift,
};
pub use local::LocalAdjustments;
pub use mask::{
    BrushSettings, CircularSettings, ColorRangeSettings, EllipticalSettings, GradientType,
    LinearSettings, Mask, MaskGlobal, MaskLayer, MaskRefinement, MaskShape, MaskType, Point2D,
    RectangularSettings, Size2D,
};

/// Generate a unique id such as `layer-1b4e28ba2fa1...`.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
