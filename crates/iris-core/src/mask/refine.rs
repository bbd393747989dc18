//! Mask refinement: reshape a raw alpha map before it gates adjustments.
//!
//! # Stage order
//! ```text
//!   raw ──→ expand ──→ feather ──→ softness ──→ edge blur
//!       ──→ falloff ──→ density ──→ invert ──→ opacity ──→ refined
//! ```
//! Only stages whose parameter differs from its neutral value run. Swapping
//! any two stages changes the output.

use crate::color::sanitize;
use crate::mask::alpha::AlphaMap;
use crate::params::mask::{MaskGlobal, MaskRefinement};

/// Largest dilation or erosion, in pixels.
pub const MAX_EXPANSION: f32 = 50.0;
/// Largest extra edge blur radius, in pixels.
pub const MAX_EDGE_BLUR: f32 = 50.0;

/// Run every active stage on `alpha` in place.
///
/// Parameters are clamped to their documented ranges first; non-finite
/// values are treated as neutral.
pub fn refine(alpha: &mut AlphaMap, refinement: &MaskRefinement, global: &MaskGlobal) {
    if alpha.dimensions().is_empty() {
        return;
    }

    let expansion = sanitize(refinement.expansion, -MAX_EXPANSION, MAX_EXPANSION, 0.0);
    if expansion != 0.0 {
        expand(alpha, expansion);
    }

    let feather = sanitize(refinement.feather, 0.0, 100.0, 0.0);
    if feather > 0.0 {
        let radius = feather / 100.0 * alpha.dimensions().min_side() * 0.1;
        tracing::debug!(radius, "mask feather");
        gaussian_blur(alpha, radius);
    }

    let softness = sanitize(refinement.softness, 0.0, 100.0, 0.0);
    if softness > 0.0 {
        gaussian_blur(alpha, softness / 100.0 * 10.0);
    }

    let edge_blur = sanitize(refinement.edge_blur, 0.0, MAX_EDGE_BLUR, 0.0);
    if edge_blur > 0.0 {
        gaussian_blur(alpha, edge_blur);
    }

    let falloff = sanitize(refinement.falloff, 0.0, 100.0, 50.0);
    if falloff != 50.0 {
        apply_falloff(alpha, falloff);
    }

    let density = sanitize(global.density, 0.0, 100.0, 100.0);
    if density != 100.0 {
        let scale = density / 100.0;
        alpha.map_in_place(|a| a * scale);
    }

    if global.inverted {
        alpha.map_in_place(|a| 1.0 - a);
    }

    let opacity = sanitize(global.opacity, 0.0, 1.0, 1.0);
    if opacity != 1.0 {
        alpha.map_in_place(|a| a * opacity);
    }
}

/// Longest distance, in pixels, any neighborhood needs to reach on `alpha`.
fn max_reach(alpha: &AlphaMap) -> f32 {
    alpha.width().max(alpha.height()) as f32
}

/// Dilate (`amount > 0`) or erode (`amount < 0`) with a disk of radius
/// `round(|amount|)` pixels.
/// The radius never exceeds the longer side of the map.
pub fn expand(alpha: &mut AlphaMap, amount: f32) {
    if !amount.is_finite() {
        return;
    }
    let radius = amount.abs().round().min(max_reach(alpha)) as i64;
    if radius == 0 {
        return;
    }
    let dilate = amount > 0.0;
    tracing::debug!(radius, dilate, "mask expansion");

    let offsets: Vec<(i64, i64)> = (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= radius * radius)
        .collect();

    let src = alpha.clone();
    let dims = src.dimensions();
    *alpha = AlphaMap::from_fn(dims, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let samples = offsets.iter().map(|(dx, dy)| src.get_clamped(x + dx, y + dy));
        if dilate {
            samples.fold(0.0, f32::max)
        } else {
            samples.fold(1.0, f32::min)
        }
    });
}

/// Normalized 1-D Gaussian kernel for a blur of `radius` pixels.
fn gaussian_kernel(radius: f32) -> Vec<f32> {
    let size = (2.0 * radius).ceil() as usize | 1;
    let sigma = (radius / 2.0).max(1e-3);
    let half = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Separable Gaussian blur, edge-clamped. The radius is capped at the longer
/// side of the map.
pub fn gaussian_blur(alpha: &mut AlphaMap, radius: f32) {
    if !radius.is_finite() || radius <= 0.0 {
        return;
    }
    let radius = radius.min(max_reach(alpha));
    let kernel = gaussian_kernel(radius);
    if kernel.len() < 2 {
        return;
    }
    let half = (kernel.len() / 2) as i64;
    let dims = alpha.dimensions();

    let horizontal = AlphaMap::from_fn(dims, |x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(i, k)| k * alpha.get_clamped(x as i64 + i as i64 - half, y as i64))
            .sum()
    });
    *alpha = AlphaMap::from_fn(dims, |x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(i, k)| k * horizontal.get_clamped(x as i64, y as i64 + i as i64 - half))
            .sum()
    });
}

/// Exponent for a falloff setting. 50 maps to 1.
pub fn falloff_gamma(falloff: f32) -> f32 {
    let falloff = falloff.clamp(0.0, 100.0);
    if falloff < 50.0 {
        1.0 + (50.0 - falloff) / 50.0 * 1.5
    } else {
        1.0 / (1.0 + (falloff - 50.0) / 50.0 * 1.5)
    }
}

pub fn apply_falloff(alpha: &mut AlphaMap, falloff: f32) {
    let gamma = falloff_gamma(falloff);
    alpha.map_in_place(|a| a.max(0.0).powf(gamma));
}
