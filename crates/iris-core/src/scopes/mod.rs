//! Scope computation for the rendered frame.

pub mod histogram;

pub use histogram::HistogramData;
