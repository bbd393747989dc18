//! Color-range selection: pixels whose HSL lies close to any sampled color.

use crate::color::hsl::hue_distance;
use crate::color::rgb_to_hsl;
use crate::image::Raster;
use crate::mask::alpha::AlphaMap;
use crate::params::mask::ColorRangeSettings;

/// Per-axis match: 1 within `range`, linear to 0 over the following
/// `softness × range / 100` units.
fn axis_match(distance: f32, range: f32, softness: f32) -> f32 {
    if distance <= range {
        return 1.0;
    }
    let band = softness * range / 100.0;
    if band > 0.0 && distance <= range + band {
        1.0 - (distance - range) / band
    } else {
        0.0
    }
}

/// Build the selection against `source`. An empty sample list selects
/// nothing.
pub fn color_range(source: &Raster, settings: &ColorRangeSettings) -> AlphaMap {
    let dims = source.dimensions();
    if settings.sampled_colors.is_empty() {
        return AlphaMap::zeros(dims);
    }

    let hue_range = settings.hue_range.max(0.0);
    let sat_range = settings.saturation_range.max(0.0);
    let lum_range = settings.luminance_range.max(0.0);
    let hue_soft = settings.hue_softness.max(0.0);
    let sat_soft = settings.saturation_softness.max(0.0);
    let lum_soft = settings.luminance_softness.max(0.0);

    let values = source
        .pixels()
        .iter()
        .map(|px| {
            let hsl = rgb_to_hsl(px[0] as f32, px[1] as f32, px[2] as f32);
            let mut best = 0.0_f32;
            for sample in &settings.sampled_colors {
                let hue = axis_match(hue_distance(hsl.h, sample.h), hue_range, hue_soft);
                let sat = axis_match((hsl.s - sample.s).abs(), sat_range, sat_soft);
                let lum = axis_match((hsl.l - sample.l).abs(), lum_range, lum_soft);
                best = best.max(hue * sat * lum);
                if best >= 1.0 {
                    break;
                }
            }
            best
        })
        .collect();

    // Lengths agree by construction.
    AlphaMap::from_values(dims, values).unwrap_or_else(|| AlphaMap::zeros(dims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsl;

    const EPSILON: f32 = 1e-4;

    fn red_and_blue() -> Raster {
        let mut data = Vec::new();
        data.extend_from_slice(&[255, 0, 0, 255]);
        data.extend_from_slice(&[0, 0, 255, 255]);
        Raster::from_rgba(2, 1, data).expect("valid raster")
    }

    #[test]
    fn test_selects_matching_hue_only() {
        let settings = ColorRangeSettings {
            sampled_colors: vec![Hsl::new(0.0, 100.0, 50.0)],
            ..Default::default()
        };
        let alpha = color_range(&red_and_blue(), &settings);
        assert_eq!(alpha.values(), &[1.0, 0.0]);
    }

    #[test]
    fn test_union_of_samples() {
        let settings = ColorRangeSettings {
            sampled_colors: vec![Hsl::new(0.0, 100.0, 50.0), Hsl::new(240.0, 100.0, 50.0)],
            ..Default::default()
        };
        let alpha = color_range(&red_and_blue(), &settings);
        assert_eq!(alpha.values(), &[1.0, 1.0]);
    }

    #[test]
    fn test_no_samples_selects_nothing() {
        let alpha = color_range(&red_and_blue(), &ColorRangeSettings::default());
        assert!(alpha.is_empty_below(EPSILON));
    }

    #[test]
    fn test_soft_band_is_linear() {
        // range 10, softness 100 → band of 10 units.
        assert_eq!(axis_match(5.0, 10.0, 100.0), 1.0);
        assert!((axis_match(15.0, 10.0, 100.0) - 0.5).abs() < EPSILON);
        assert_eq!(axis_match(20.5, 10.0, 100.0), 0.0);
        assert_eq!(axis_match(10.5, 10.0, 0.0), 0.0, "no band without softness");
    }

    #[test]
    fn test_hue_distance_wraps_around() {
        // Hue 350 is 10 degrees from hue 0.
        let settings = ColorRangeSettings {
            hue_range: 15.0,
            sampled_colors: vec![Hsl::new(350.0, 100.0, 50.0)],
            ..Default::default()
        };
        let alpha = color_range(&red_and_blue(), &settings);
        assert_eq!(alpha.get(0, 0), 1.0);
    }
}
