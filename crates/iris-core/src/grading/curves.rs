//! Curves layer: a master LUT followed by one LUT per channel.
//!
//! ```text
//!   out[c] = lut[c](master(in[c]))
//! ```

use crate::image::{Raster, to_channel};
use crate::params::layer::CurveAdjustments;
use crate::transform::lut::CurveLut;

/// The four tables baked from a curves payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveTables {
    pub master: CurveLut,
    pub channels: [CurveLut; 3],
}

impl CurveTables {
    pub fn build(curves: &CurveAdjustments) -> Self {
        Self {
            master: CurveLut::build(&curves.master),
            channels: [
                CurveLut::build(&curves.red),
                CurveLut::build(&curves.green),
                CurveLut::build(&curves.blue),
            ],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.master.is_identity() && self.channels.iter().all(CurveLut::is_identity)
    }

    /// Map one pixel's RGB through master then its channel table.
    pub fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        [0, 1, 2].map(|c| self.channels[c].apply(self.master.apply(rgb[c])))
    }
}

/// Apply a curves layer in place, blended by `opacity`.
pub fn apply_curves_layer(raster: &mut Raster, curves: &CurveAdjustments, opacity: f32) {
    let tables = CurveTables::build(curves);
    if tables.is_identity() {
        return;
    }

    for px in raster.pixels_mut() {
        let mapped = tables.apply([px[0], px[1], px[2]]);
        for c in 0..3 {
            let orig = px[c] as f32;
            px[c] = to_channel(orig + (mapped[c] as f32 - orig) * opacity);
        }
    }
}
