//! Effects layer: film grain, vignette, box blur, sepia and sharpening.
//!
//! Stages run in that order, each only when its magnitude is above zero.
//! Magnitudes are normalized to `[0, 1]`. Unlike the other layer kinds the
//! stages fold `opacity` into their own strength and write the buffer
//! directly; there is no final orig/adjusted blend.

use glam::Vec2;
use rand::Rng;

use crate::image::{Raster, to_channel};
use crate::params::layer::EffectAdjustments;

/// Apply an effects layer in place. `rng` drives the grain noise.
pub fn apply_effects_layer(
    raster: &mut Raster,
    effects: &EffectAdjustments,
    opacity: f32,
    rng: &mut impl Rng,
) {
    let strength = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };

    let grain = strength(effects.grain);
    if grain > 0.0 {
        apply_grain(raster, grain * 255.0 * opacity, rng);
    }

    let vignette = strength(effects.vignette);
    if vignette > 0.0 {
        apply_vignette(raster, vignette * opacity);
    }

    let blur = strength(effects.blur);
    if blur > 0.0 {
        let radius = (blur * 10.0 * opacity).floor() as usize;
        box_blur(raster, radius);
    }

    let sepia = strength(effects.sepia);
    if sepia > 0.0 {
        apply_sepia(raster, sepia * opacity);
    }

    let sharpness = strength(effects.sharpness);
    if sharpness > 0.0 {
        sharpen(raster, sharpness * opacity);
    }
}

/// Add uniform noise in `[−amplitude/2, amplitude/2]`, drawn independently
/// for every channel of every pixel.
pub fn apply_grain(raster: &mut Raster, amplitude: f32, rng: &mut impl Rng) {
    let half = amplitude / 2.0;
    if half.is_nan() || half <= 0.0 {
        return;
    }
    for px in raster.pixels_mut() {
        for c in 0..3 {
            let noise: f32 = rng.random_range(-half..=half);
            px[c] = to_channel(px[c] as f32 + noise);
        }
    }
}

/// Darken toward the corners.
///
/// ```text
///   factor = 1 − (dist / maxDist) × strength
/// ```
/// where distances are measured from the image center and `maxDist` reaches
/// the corner.
pub fn apply_vignette(raster: &mut Raster, strength: f32) {
    let center = Vec2::new(raster.width() as f32 / 2.0, raster.height() as f32 / 2.0);
    let max_dist = center.length();
    if max_dist <= 0.0 {
        return;
    }
    let width = raster.width() as usize;

    for (i, px) in raster.pixels_mut().iter_mut().enumerate() {
        let pos = Vec2::new((i % width) as f32, (i / width) as f32);
        let factor = 1.0 - pos.distance(center) / max_dist * strength;
        for c in 0..3 {
            px[c] = to_channel(px[c] as f32 * factor);
        }
    }
}

/// Separable box blur. Each pass averages only the in-bounds neighbours.
pub fn box_blur(raster: &mut Raster, radius: usize) {
    if radius == 0 {
        return;
    }
    let (w, h) = (raster.width() as usize, raster.height() as usize);
    blur_pass(raster, radius, |x, y, d| {
        let nx = x as isize + d;
        (nx >= 0 && (nx as usize) < w).then(|| y * w + nx as usize)
    });
    blur_pass(raster, radius, |x, y, d| {
        let ny = y as isize + d;
        (ny >= 0 && (ny as usize) < h).then(|| ny as usize * w + x)
    });
}

/// One blur direction. `neighbour(x, y, d)` gives the pixel index at offset
/// `d`, or `None` when it falls outside the image.
fn blur_pass(
    raster: &mut Raster,
    radius: usize,
    neighbour: impl Fn(usize, usize, isize) -> Option<usize>,
) {
    let src = raster.pixels().to_vec();
    let width = raster.width() as usize;
    let r = radius as isize;

    for (i, px) in raster.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        let mut sum = [0.0_f32; 3];
        let mut count = 0.0_f32;
        for d in -r..=r {
            if let Some(j) = neighbour(x, y, d) {
                for c in 0..3 {
                    sum[c] += src[j][c] as f32;
                }
                count += 1.0;
            }
        }
        for c in 0..3 {
            px[c] = to_channel(sum[c] / count);
        }
    }
}

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Blend toward the classic sepia tone matrix by `amount`.
pub fn apply_sepia(raster: &mut Raster, amount: f32) {
    for px in raster.pixels_mut() {
        let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
        for c in 0..3 {
            let toned = SEPIA[c][0] * rgb[0] + SEPIA[c][1] * rgb[1] + SEPIA[c][2] * rgb[2];
            px[c] = to_channel(rgb[c] + (toned.min(255.0) - rgb[c]) * amount);
        }
    }
}

/// 3×3 cross unsharp mask, edge-clamped.
///
/// ```text
///   out = in + amount × (4·in − up − down − left − right)
/// ```
pub fn sharpen(raster: &mut Raster, amount: f32) {
    let src = raster.clone();
    let (w, h) = (raster.width() as i64, raster.height() as i64);
    let at = |x: i64, y: i64| src.pixel(x.clamp(0, w - 1) as u32, y.clamp(0, h - 1) as u32);

    for (i, px) in raster.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i as i64 % w, i as i64 / w);
        let neighbours = [at(x - 1, y), at(x + 1, y), at(x, y - 1), at(x, y + 1)];
        for c in 0..3 {
            let center = px[c] as f32;
            let ring: f32 = neighbours.iter().map(|n| n[c] as f32).sum();
            px[c] = to_channel(center + amount * (4.0 * center - ring));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn checker() -> Raster {
        let data = (0..16u32)
            .flat_map(|i| {
                let v = if (i % 4 + i / 4) % 2 == 0 { 200 } else { 40 };
                [v, v, v, 255]
            })
            .collect();
        Raster::from_rgba(4, 4, data).expect("valid raster")
    }

    #[test]
    fn test_neutral_effects_are_identity() {
        let mut raster = checker();
        let mut rng = StdRng::seed_from_u64(7);
        apply_effects_layer(&mut raster, &EffectAdjustments::default(), 1.0, &mut rng);
        assert_eq!(raster, checker());
    }

    #[test]
    fn test_grain_is_bounded_and_per_channel() {
        let mut raster = Raster::filled(16, 16, [128, 128, 128, 255]);
        let mut rng = StdRng::seed_from_u64(42);
        apply_grain(&mut raster, 40.0, &mut rng);

        let mut channels_differ = false;
        for px in raster.pixels() {
            for c in 0..3 {
                assert!((108..=148).contains(&px[c]), "noise out of range: {px:?}");
            }
            assert_eq!(px[3], 255, "alpha untouched");
            channels_differ |= px[0] != px[1] || px[1] != px[2];
        }
        assert!(channels_differ, "channels should receive independent noise");
    }

    #[test]
    fn test_grain_is_reproducible_with_seed() {
        let mut a = Raster::filled(4, 4, [100, 100, 100, 255]);
        let mut b = a.clone();
        apply_grain(&mut a, 50.0, &mut StdRng::seed_from_u64(3));
        apply_grain(&mut b, 50.0, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_vignette_darkens_toward_corners() {
        let mut raster = Raster::filled(5, 5, [200, 200, 200, 255]);
        apply_vignette(&mut raster, 1.0);
        let corner = raster.pixel(0, 0)[0];
        let center = raster.pixel(2, 2)[0];
        assert!(corner < center, "corner {corner} should be darker than {center}");
        assert_eq!(corner, 0, "corner sits at maxDist");
    }

    #[test]
    fn test_box_blur_preserves_flat_and_smooths_edges() {
        let mut flat = Raster::filled(3, 3, [90, 90, 90, 255]);
        box_blur(&mut flat, 2);
        assert_eq!(flat, Raster::filled(3, 3, [90, 90, 90, 255]));

        let mut raster = checker();
        box_blur(&mut raster, 1);
        let px = raster.pixel(1, 1)[0];
        assert!(px > 40 && px < 200, "blurred value {px}");
    }

    #[test]
    fn test_blur_radius_rounds_down() {
        // 0.05 × 10 = 0.5 → radius 0 → no-op.
        let mut raster = checker();
        let effects = EffectAdjustments {
            blur: 0.05,
            ..Default::default()
        };
        apply_effects_layer(&mut raster, &effects, 1.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(raster, checker());
    }

    #[test]
    fn test_full_sepia_of_white() {
        let mut raster = Raster::filled(1, 1, [255, 255, 255, 255]);
        apply_sepia(&mut raster, 1.0);
        assert_eq!(raster.pixel(0, 0), [255, 255, 239, 255]);
    }

    #[test]
    fn test_sharpen_leaves_flat_untouched_and_boosts_contrast() {
        let mut flat = Raster::filled(3, 3, [77, 77, 77, 255]);
        sharpen(&mut flat, 1.0);
        assert_eq!(flat, Raster::filled(3, 3, [77, 77, 77, 255]));

        let mut raster = checker();
        sharpen(&mut raster, 0.1);
        assert!(raster.pixel(1, 1)[0] > 200);
        assert!(raster.pixel(1, 2)[0] < 40);
    }
}
