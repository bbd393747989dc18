//! Adjustments applied only where a mask selects.

use serde::{Deserialize, Serialize};

/// Signed local adjustments. 0 everywhere = no change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalAdjustments {
    /// −100..100; every 50 doubles or halves the light.
    pub exposure: f32,
    /// −100..100 around mid-gray.
    pub contrast: f32,
    /// −100..100 percent points of HSL saturation.
    pub saturation: f32,
    /// −100..100 warm/cool shift.
    pub temperature: f32,
    /// −180..180 degrees.
    pub hue: f32,
    /// −100..100 lift of dark tones.
    pub shadows: f32,
    /// −100..100 lift of bright tones.
    pub highlights: f32,
    /// 0..100 unsharp-mask amount.
    pub sharpness: f32,
}

impl LocalAdjustments {
    pub fn is_neutral(&self) -> bool {
        !self.has_color_adjustments() && self.sharpness == 0.0
    }

    /// Any of the per-pixel color operations is active.
    pub fn has_color_adjustments(&self) -> bool {
        self.exposure != 0.0
            || self.contrast != 0.0
            || self.saturation != 0.0
            || self.temperature != 0.0
            || self.hue != 0.0
            || self.shadows != 0.0
            || self.highlights != 0.0
    }

    /// Copy with every field clamped to its documented range; non-finite
    /// values become 0.
    pub fn sanitized(&self) -> Self {
        use crate::color::sanitize;
        Self {
            exposure: sanitize(self.exposure, -100.0, 100.0, 0.0),
            contrast: sanitize(self.contrast, -100.0, 100.0, 0.0),
            saturation: sanitize(self.saturation, -100.0, 100.0, 0.0),
            temperature: sanitize(self.temperature, -100.0, 100.0, 0.0),
            hue: sanitize(self.hue, -180.0, 180.0, 0.0),
            shadows: sanitize(self.shadows, -100.0, 100.0, 0.0),
            highlights: sanitize(self.highlights, -100.0, 100.0, 0.0),
            sharpness: sanitize(self.sharpness, 0.0, 100.0, 0.0),
        }
    }
}
