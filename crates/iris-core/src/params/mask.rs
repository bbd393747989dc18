//! Professional mask definitions.
//!
//! A `Mask` describes how to build an alpha map: one shape payload picks the
//! generator, `refinement` reshapes its edges, and `global` scales the result.
//! A `MaskLayer` pairs a mask with the local adjustments it gates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Hsl;
use crate::mask::brush::BrushBitmap;
use crate::params::local::LocalAdjustments;

/// Overlay palette cycled through as masks are added.
pub const MASK_PREVIEW_COLORS: [&str; 10] = [
    "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#dda0dd", "#ffb347", "#98d8c8", "#f7dc6f",
    "#bb8fce", "#85c1e9",
];

/// Palette entry for the `index`-th mask, wrapping around.
pub fn preview_color(index: usize) -> &'static str {
    MASK_PREVIEW_COLORS[index % MASK_PREVIEW_COLORS.len()]
}

/// A point in image-proportional coordinates (`0..1` on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A size in image-proportional units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f32,
    pub height: f32,
}

/// Discriminant of a mask's shape payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskType {
    ColorRange,
    Circular,
    Elliptical,
    Rectangular,
    Linear,
    Brush,
}

impl MaskType {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ColorRange => "Color Range Mask",
            Self::Circular => "Circular Mask",
            Self::Elliptical => "Elliptical Mask",
            Self::Rectangular => "Rectangular Mask",
            Self::Linear => "Linear Mask",
            Self::Brush => "Brush Mask",
        }
    }

    /// Preview color assigned by the factory for this type.
    pub const fn default_preview_color(&self) -> &'static str {
        match self {
            Self::ColorRange => "#ff6b6b",
            Self::Circular => "#4ecdc4",
            Self::Elliptical => "#45b7d1",
            Self::Rectangular => "#96ceb4",
            Self::Linear => "#dda0dd",
            Self::Brush => "#ffb347",
        }
    }
}

/// Controls applied to the finished alpha map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskGlobal {
    /// Final multiplier in `[0, 1]`.
    pub opacity: f32,
    pub inverted: bool,
    /// Disabled masks are skipped by the pipeline entirely.
    pub enabled: bool,
    /// Intensity in percent. 100 = neutral.
    pub density: f32,
}

impl Default for MaskGlobal {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            inverted: false,
            enabled: true,
            density: 100.0,
        }
    }
}

/// Edge shaping controls, applied before the global controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskRefinement {
    /// Main Gaussian softening, 0..100, scaled by image size.
    pub feather: f32,
    /// Secondary small blur, 0..100 (up to a 10 px radius).
    pub softness: f32,
    /// Transition curve, 0..100. 50 = linear.
    pub falloff: f32,
    /// Extra blur radius in pixels, 0..50.
    pub edge_blur: f32,
    /// Dilation (positive) or erosion (negative) in pixels, −50..50.
    pub expansion: f32,
}

impl Default for MaskRefinement {
    fn default() -> Self {
        Self {
            feather: 0.0,
            softness: 0.0,
            falloff: 50.0,
            edge_blur: 0.0,
            expansion: 0.0,
        }
    }
}

/// Select pixels by similarity to sampled HSL colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRangeSettings {
    /// Full-match hue tolerance in degrees, 0..180.
    pub hue_range: f32,
    /// Soft band beyond `hue_range`, as a percent of it.
    pub hue_softness: f32,
    pub saturation_range: f32,
    pub saturation_softness: f32,
    pub luminance_range: f32,
    pub luminance_softness: f32,
    /// Picked colors; a pixel matching any of them is selected.
    pub sampled_colors: Vec<Hsl>,
}

impl Default for ColorRangeSettings {
    fn default() -> Self {
        Self {
            hue_range: 30.0,
            hue_softness: 10.0,
            saturation_range: 50.0,
            saturation_softness: 10.0,
            luminance_range: 50.0,
            luminance_softness: 10.0,
            sampled_colors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularSettings {
    pub center: Point2D,
    /// Radius as a fraction of the smaller image side.
    pub radius: f32,
    /// Percent of the radius faded inward.
    pub inner_feather: f32,
    /// Percent of the radius faded outward.
    pub outer_feather: f32,
}

impl Default for CircularSettings {
    fn default() -> Self {
        Self {
            center: Point2D::new(0.5, 0.5),
            radius: 0.3,
            inner_feather: 0.0,
            outer_feather: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EllipticalSettings {
    pub center: Point2D,
    /// Horizontal radius as a fraction of the image width.
    pub radius_x: f32,
    /// Vertical radius as a fraction of the image height.
    pub radius_y: f32,
    /// Rotation in degrees, −180..180.
    pub rotation: f32,
    pub inner_feather: f32,
    pub outer_feather: f32,
}

impl Default for EllipticalSettings {
    fn default() -> Self {
        Self {
            center: Point2D::new(0.5, 0.5),
            radius_x: 0.4,
            radius_y: 0.25,
            rotation: 0.0,
            inner_feather: 0.0,
            outer_feather: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangularSettings {
    /// Top-left corner before rotation.
    pub position: Point2D,
    pub size: Size2D,
    /// Rotation around the rectangle center, in degrees.
    pub rotation: f32,
    /// Corner rounding, percent of half the shorter side.
    pub corner_radius: f32,
    /// Edge fade, percent of half the shorter side.
    pub feather: f32,
}

impl Default for RectangularSettings {
    fn default() -> Self {
        Self {
            position: Point2D::new(0.25, 0.25),
            size: Size2D {
                width: 0.5,
                height: 0.5,
            },
            rotation: 0.0,
            corner_radius: 0.0,
            feather: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientType {
    /// 0 at the start point ramping to 1 at the end point.
    #[default]
    Linear,
    /// 1 at the midpoint falling to 0 on both sides.
    Reflected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearSettings {
    pub start: Point2D,
    pub end: Point2D,
    pub gradient_type: GradientType,
    /// Position of the 50% point along the axis, 0..1.
    pub midpoint: f32,
}

impl Default for LinearSettings {
    fn default() -> Self {
        Self {
            start: Point2D::new(0.5, 0.0),
            end: Point2D::new(0.5, 1.0),
            gradient_type: GradientType::Linear,
            midpoint: 0.5,
        }
    }
}

/// Brush tool settings plus the painted bitmap supplied by the drawing UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushSettings {
    pub brush_size: f32,
    pub brush_softness: f32,
    pub brush_flow: f32,
    pub brush_spacing: f32,
    pub bitmap: Option<BrushBitmap>,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            brush_size: 50.0,
            brush_softness: 30.0,
            brush_flow: 75.0,
            brush_spacing: 10.0,
            bitmap: None,
        }
    }
}

/// Per-type settings. Exactly one is present; the variant is the mask type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MaskShape {
    ColorRange(ColorRangeSettings),
    Circular(CircularSettings),
    Elliptical(EllipticalSettings),
    Rectangular(RectangularSettings),
    Linear(LinearSettings),
    Brush(BrushSettings),
}

impl MaskShape {
    /// Default settings for a type.
    pub fn for_type(mask_type: MaskType) -> Self {
        match mask_type {
            MaskType::ColorRange => Self::ColorRange(ColorRangeSettings::default()),
            MaskType::Circular => Self::Circular(CircularSettings::default()),
            MaskType::Elliptical => Self::Elliptical(EllipticalSettings::default()),
            MaskType::Rectangular => Self::Rectangular(RectangularSettings::default()),
            MaskType::Linear => Self::Linear(LinearSettings::default()),
            MaskType::Brush => Self::Brush(BrushSettings::default()),
        }
    }

    pub fn mask_type(&self) -> MaskType {
        match self {
            Self::ColorRange(_) => MaskType::ColorRange,
            Self::Circular(_) => MaskType::Circular,
            Self::Elliptical(_) => MaskType::Elliptical,
            Self::Rectangular(_) => MaskType::Rectangular,
            Self::Linear(_) => MaskType::Linear,
            Self::Brush(_) => MaskType::Brush,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mask {
    pub id: String,
    pub name: String,
    pub global: MaskGlobal,
    pub refinement: MaskRefinement,
    pub shape: MaskShape,
    /// Compositing priority, ascending. Mirrors the position in the mask stack.
    pub order: i32,
    /// Hex color for the on-screen overlay.
    pub preview_color: String,
}

impl Mask {
    /// A mask with default settings for its shape.
    pub fn new(shape: MaskShape) -> Self {
        let mask_type = shape.mask_type();
        Self {
            id: crate::params::new_id("mask"),
            name: mask_type.label().to_string(),
            global: MaskGlobal::default(),
            refinement: MaskRefinement::default(),
            shape,
            order: 0,
            preview_color: mask_type.default_preview_color().to_string(),
        }
    }

    pub fn of_type(mask_type: MaskType) -> Self {
        Self::new(MaskShape::for_type(mask_type))
    }

    pub fn color_range() -> Self {
        Self::of_type(MaskType::ColorRange)
    }

    pub fn circular() -> Self {
        Self::of_type(MaskType::Circular)
    }

    pub fn elliptical() -> Self {
        Self::of_type(MaskType::Elliptical)
    }

    pub fn rectangular() -> Self {
        Self::of_type(MaskType::Rectangular)
    }

    pub fn linear() -> Self {
        Self::of_type(MaskType::Linear)
    }

    pub fn brush() -> Self {
        Self::of_type(MaskType::Brush)
    }

    pub fn mask_type(&self) -> MaskType {
        self.shape.mask_type()
    }
}

/// A mask together with the local adjustments it gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskLayer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub mask: Mask,
    pub adjustments: LocalAdjustments,
}

impl MaskLayer {
    /// Wrap a mask with neutral adjustments, named after the mask.
    pub fn new(mask: Mask) -> Self {
        Self {
            id: crate::params::new_id("layer"),
            name: mask.name.clone(),
            visible: true,
            mask,
            adjustments: LocalAdjustments::default(),
        }
    }

    pub fn with_adjustments(mut self, adjustments: LocalAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Whether the pipeline should render this layer.
    pub fn is_active(&self) -> bool {
        self.visible && self.mask.global.enabled
    }
}
