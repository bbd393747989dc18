//! RGB + luminance histogram computation.

use serde::{Deserialize, Serialize};

use crate::color::luma;
use crate::image::{Raster, to_channel};

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Histogram data for R, G, B, and luminance channels (256 bins each).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramData {
    /// Bin counts for `[R, G, B, Luma]` channels. Each `Vec` has 256 entries.
    pub bins: [Vec<u32>; 4],
    /// Peak bin value across all channels (for normalization).
    pub peak: u32,
}

impl HistogramData {
    pub fn red(&self) -> &[u32] {
        &self.bins[0]
    }

    pub fn green(&self) -> &[u32] {
        &self.bins[1]
    }

    pub fn blue(&self) -> &[u32] {
        &self.bins[2]
    }

    pub fn luma(&self) -> &[u32] {
        &self.bins[3]
    }

    /// Bin counts scaled so the peak bin is 1.0.
    pub fn normalized(&self, channel: usize) -> Vec<f32> {
        let peak = self.peak.max(1) as f32;
        self.bins[channel].iter().map(|&c| c as f32 / peak).collect()
    }
}

/// Compute histogram from a raster. Alpha is ignored.
pub fn compute(raster: &Raster) -> HistogramData {
    let mut bins: [Vec<u32>; 4] = std::array::from_fn(|_| vec![0u32; BINS]);

    for px in raster.pixels() {
        bins[0][px[0] as usize] += 1;
        bins[1][px[1] as usize] += 1;
        bins[2][px[2] as usize] += 1;
        let y = luma([px[0] as f32, px[1] as f32, px[2] as f32]);
        bins[3][to_channel(y) as usize] += 1;
    }

    let peak = bins
        .iter()
        .flat_map(|b| b.iter().copied())
        .max()
        .unwrap_or(0);

    HistogramData { bins, peak }
}
