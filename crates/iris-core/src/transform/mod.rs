//! Tone transforms — curve control points and baked lookup tables.

pub mod lut;

pub use lut::{CurveLut, CurvePoint};
