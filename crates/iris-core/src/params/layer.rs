//! Global adjustment layers.
//!
//! A `Layer` owns exactly one adjustment payload; the payload's variant is the
//! layer's kind. Every tool writes here and the compositor reads the full
//! record on each render.

use serde::{Deserialize, Serialize};

use crate::color::Hsl;
use crate::transform::lut::{CurvePoint, identity_points};

/// The four kinds of global layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    /// Exposure, contrast, saturation, temperature and color balance.
    Color,
    /// Per-channel tone curves.
    Curves,
    /// Grain, vignette, blur, sepia and sharpening.
    Effects,
    /// Brush-painted hand mask with HSL shifts (predates the mask system).
    Selection,
}

impl LayerKind {
    /// Human-readable label, used for default layer names.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Curves => "Curves",
            Self::Effects => "Effects",
            Self::Selection => "Selection",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [LayerKind; 4] = [
            LayerKind::Color,
            LayerKind::Curves,
            LayerKind::Effects,
            LayerKind::Selection,
        ];
        &ALL
    }
}

/// Primary color sliders. Percentages pivot on 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAdjustments {
    /// Multiplicative exposure in percent. 100 = neutral.
    pub exposure: f32,
    /// Contrast around mid-gray in percent. 100 = neutral.
    pub contrast: f32,
    /// Saturation in percent. 100 = neutral.
    pub saturation: f32,
    /// Warm/cool shift, roughly −100..100. 0 = neutral.
    pub temperature: f32,
    /// Green/magenta shift, roughly −100..100. 0 = neutral.
    pub tint: f32,
    /// Hue rotation in degrees. 0 = neutral.
    pub hue: f32,
}

impl Default for ColorAdjustments {
    fn default() -> Self {
        Self {
            exposure: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            temperature: 0.0,
            tint: 0.0,
            hue: 0.0,
        }
    }
}

/// An additive RGB shift for one tonal zone, roughly −100..100 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneShift {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ZoneShift {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Shadows / midtones / highlights color balance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorBalance {
    pub shadows: ZoneShift,
    pub midtones: ZoneShift,
    pub highlights: ZoneShift,
}

/// Master and per-channel curves. Each list holds at least the 0 and 255 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveAdjustments {
    pub master: Vec<CurvePoint>,
    pub red: Vec<CurvePoint>,
    pub green: Vec<CurvePoint>,
    pub blue: Vec<CurvePoint>,
}

impl Default for CurveAdjustments {
    fn default() -> Self {
        Self {
            master: identity_points(),
            red: identity_points(),
            green: identity_points(),
            blue: identity_points(),
        }
    }
}

/// Stylize effects. All magnitudes are normalized to `[0, 1]`; 0 = off.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectAdjustments {
    pub vignette: f32,
    pub blur: f32,
    pub grain: f32,
    pub sepia: f32,
    pub sharpness: f32,
}

/// How a legacy selection layer decides which pixels it affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Pick by sampled color. Not rendered; kept for documents that set it.
    #[default]
    Color,
    /// Hand-painted mask bytes.
    Brush,
}

/// Painting tool last used on a legacy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushTool {
    #[default]
    Brush,
    Eraser,
    Rectangle,
    Ellipse,
}

/// Legacy selection payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionAdjustments {
    pub selected_color: Option<Hsl>,
    pub tolerance: f32,
    /// Hue shift in degrees at full mask strength.
    pub local_hue: f32,
    /// Saturation shift in percent points at full mask strength.
    pub local_saturation: f32,
    /// Lightness shift; applied at half weight.
    pub local_brightness: f32,
    pub mask_mode: SelectionMode,
    /// RGBA bytes matching the image size. Strength is `max(R, A)`.
    pub mask_data: Option<Vec<u8>>,
    pub brush_size: f32,
    pub brush_tool: BrushTool,
}

impl SelectionAdjustments {
    pub fn has_adjustments(&self) -> bool {
        self.local_hue != 0.0 || self.local_saturation != 0.0 || self.local_brightness != 0.0
    }
}

impl Default for SelectionAdjustments {
    fn default() -> Self {
        Self {
            selected_color: None,
            tolerance: 30.0,
            local_hue: 0.0,
            local_saturation: 0.0,
            local_brightness: 0.0,
            mask_mode: SelectionMode::Color,
            mask_data: None,
            brush_size: 30.0,
            brush_tool: BrushTool::Brush,
        }
    }
}

/// The payload of a layer. Its variant determines the layer kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayerAdjustments {
    Color {
        color: ColorAdjustments,
        balance: ColorBalance,
    },
    Curves(CurveAdjustments),
    Effects(EffectAdjustments),
    Selection(SelectionAdjustments),
}

impl LayerAdjustments {
    /// Neutral payload for a kind.
    pub fn neutral(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Color => Self::Color {
                color: ColorAdjustments::default(),
                balance: ColorBalance::default(),
            },
            LayerKind::Curves => Self::Curves(CurveAdjustments::default()),
            LayerKind::Effects => Self::Effects(EffectAdjustments::default()),
            LayerKind::Selection => Self::Selection(SelectionAdjustments::default()),
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Color { .. } => LayerKind::Color,
            Self::Curves(_) => LayerKind::Curves,
            Self::Effects(_) => LayerKind::Effects,
            Self::Selection(_) => LayerKind::Selection,
        }
    }
}

/// A global adjustment layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    /// Blend weight in `[0, 1]`.
    pub opacity: f32,
    pub adjustments: LayerAdjustments,
}

impl Layer {
    /// Create a neutral layer of `kind`, named after its position in the stack.
    pub fn new(kind: LayerKind, index: usize) -> Self {
        Self {
            id: crate::params::new_id("layer"),
            name: format!("{} {}", kind.label(), index + 1),
            visible: true,
            opacity: 1.0,
            adjustments: LayerAdjustments::neutral(kind),
        }
    }

    pub fn color(index: usize) -> Self {
        Self::new(LayerKind::Color, index)
    }

    pub fn curves(index: usize) -> Self {
        Self::new(LayerKind::Curves, index)
    }

    pub fn effects(index: usize) -> Self {
        Self::new(LayerKind::Effects, index)
    }

    pub fn selection(index: usize) -> Self {
        Self::new(LayerKind::Selection, index)
    }

    pub fn kind(&self) -> LayerKind {
        self.adjustments.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_payload_matches_kind() {
        for (i, kind) in LayerKind::all().iter().enumerate() {
            let layer = Layer::new(*kind, i);
            assert_eq!(layer.kind(), *kind);
            assert!(layer.visible);
            assert_eq!(layer.opacity, 1.0);
            assert_eq!(layer.name, format!("{} {}", kind.label(), i + 1));
        }
    }

    #[test]
    fn test_factory_ids_are_unique() {
        assert_ne!(Layer::color(0).id, Layer::color(0).id);
    }

    #[test]
    fn test_curve_defaults_hold_boundary_points() {
        let curves = CurveAdjustments::default();
        for list in [&curves.master, &curves.red, &curves.green, &curves.blue] {
            assert_eq!(list.first().map(|p| p.x), Some(0.0));
            assert_eq!(list.last().map(|p| p.x), Some(255.0));
        }
    }

    #[test]
    fn test_layer_serializes_with_kind_tag() {
        let layer = Layer::effects(2);
        let json = serde_json::to_value(&layer).expect("serialize");
        assert_eq!(json["adjustments"]["type"], "effects");
        let back: Layer = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, layer);
    }

    #[test]
    fn test_selection_defaults() {
        let sel = SelectionAdjustments::default();
        assert_eq!(sel.tolerance, 30.0);
        assert_eq!(sel.mask_mode, SelectionMode::Color);
        assert!(!sel.has_adjustments());
    }
}
