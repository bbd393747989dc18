//! RGB ↔ HSL conversion on the 0–255 / degrees / percent scales used by the UI.
//!
//! Hue is in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
//! Achromatic colors (max == min) report hue 0.

use serde::{Deserialize, Serialize};

use super::sanitize;

/// An HSL color. `h` in degrees, `s` and `l` in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

/// Convert 0–255 RGB channels (fractional values allowed) to HSL.
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> Hsl {
    let r = sanitize(r, 0.0, 255.0, 0.0) / 255.0;
    let g = sanitize(g, 0.0, 255.0, 0.0) / 255.0;
    let b = sanitize(b, 0.0, 255.0, 0.0) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;

    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h * 60.0, s * 100.0, l * 100.0)
}

/// Convert HSL back to rounded 0–255 RGB.
///
/// Hue is wrapped into `[0, 360)`, saturation and lightness are clamped to
/// `[0, 100]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let h = wrap_hue(if h.is_finite() { h } else { 0.0 }) / 360.0;
    let s = sanitize(s, 0.0, 100.0, 0.0) / 100.0;
    let l = sanitize(l, 0.0, 100.0, 0.0) / 100.0;

    if s == 0.0 {
        let v = unit_to_byte(l);
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        unit_to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        unit_to_byte(hue_to_rgb(p, q, h)),
        unit_to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    ]
}

/// Wrap a hue in degrees into `[0, 360)`.
pub fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest angular distance between two hues, in degrees `[0, 180]`.
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    if d > 180.0 { 360.0 - d } else { d }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_roundtrip_within_one_level() {
        for r in (0..=255u16).step_by(3) {
            for g in (0..=255u16).step_by(3) {
                for b in (0..=255u16).step_by(3) {
                    let hsl = rgb_to_hsl(r as f32, g as f32, b as f32);
                    let back = hsl_to_rgb(hsl.h, hsl.s, hsl.l);
                    let orig = [r as i16, g as i16, b as i16];
                    for c in 0..3 {
                        assert!(
                            (back[c] as i16 - orig[c]).abs() <= 1,
                            "({r},{g},{b}) -> {hsl:?} -> {back:?}"
                        );
                    }
                }
            }
        }
    }

    fn assert_roundtrip(rgb: [u8; 3]) {
        let hsl = rgb_to_hsl(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32);
        let back = hsl_to_rgb(hsl.h, hsl.s, hsl.l);
        for c in 0..3 {
            assert!(
                (back[c] as i16 - rgb[c] as i16).abs() <= 1,
                "{rgb:?} -> {hsl:?} -> {back:?}"
            );
        }
    }

    #[test]
    fn test_roundtrip_every_channel_value() {
        let anchors = [0u8, 1, 127, 128, 254, 255];
        for v in 0..=255u8 {
            for a in anchors {
                for b in anchors {
                    assert_roundtrip([v, a, b]);
                    assert_roundtrip([a, v, b]);
                    assert_roundtrip([a, b, v]);
                }
            }
            assert_roundtrip([v, v, v]);
        }
    }

    #[test]
    fn test_roundtrip_extremes() {
        for rgb in [[255u8, 255, 255], [0, 0, 0], [255, 0, 0], [0, 255, 1], [254, 1, 128]] {
            let hsl = rgb_to_hsl(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32);
            let back = hsl_to_rgb(hsl.h, hsl.s, hsl.l);
            for c in 0..3 {
                assert!((back[c] as i16 - rgb[c] as i16).abs() <= 1, "{rgb:?} vs {back:?}");
            }
        }
    }

    #[test]
    fn test_gray_has_zero_hue_and_saturation() {
        let hsl = rgb_to_hsl(128.0, 128.0, 128.0);
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 50.196).abs() < EPSILON);
    }

    #[test]
    fn test_primary_hues() {
        assert!((rgb_to_hsl(255.0, 0.0, 0.0).h - 0.0).abs() < EPSILON);
        assert!((rgb_to_hsl(0.0, 255.0, 0.0).h - 120.0).abs() < EPSILON);
        assert!((rgb_to_hsl(0.0, 0.0, 255.0).h - 240.0).abs() < EPSILON);
        assert!((rgb_to_hsl(255.0, 0.0, 255.0).h - 300.0).abs() < EPSILON);
    }

    #[test]
    fn test_out_of_range_components_are_clamped() {
        assert_eq!(hsl_to_rgb(720.0, 150.0, 50.0), hsl_to_rgb(0.0, 100.0, 50.0));
        assert_eq!(hsl_to_rgb(-120.0, 100.0, 50.0), hsl_to_rgb(240.0, 100.0, 50.0));
        assert_eq!(hsl_to_rgb(f32::NAN, 0.0, 200.0), [255, 255, 255]);
    }

    #[test]
    fn test_hue_distance_wraps() {
        assert!((hue_distance(350.0, 10.0) - 20.0).abs() < EPSILON);
        assert!((hue_distance(10.0, 350.0) - 20.0).abs() < EPSILON);
        assert!((hue_distance(90.0, 270.0) - 180.0).abs() < EPSILON);
    }
}
