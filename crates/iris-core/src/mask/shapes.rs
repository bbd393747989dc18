//! Geometric mask generators: circle, ellipse, rounded rectangle and linear
//! gradient.
//!
//! Positions arrive in image-proportional units and land on the pixel grid
//! with `p × (dim − 1)`, so `0` is the first pixel and `1` the last. Extents
//! (radii, rectangle size) scale with the full dimension.
//!
//! ```text
//!   1 ┤━━━━━━━━┓
//!     │        ┃╲
//!     │        ┃ ╲          inner/outer feather ramp
//!   0 ┤        ┃  ╲━━━━━━━
//!     └────────┸───┸──────→ distance
//!            inner outer
//! ```

use glam::Vec2;

use crate::image::Dimensions;
use crate::mask::alpha::AlphaMap;
use crate::params::mask::{
    CircularSettings, EllipticalSettings, GradientType, LinearSettings, Point2D,
    RectangularSettings,
};

/// Pixel-space position of a normalized point.
pub fn to_pixel(p: Point2D, dims: Dimensions) -> Vec2 {
    let span = Vec2::new(
        dims.width.saturating_sub(1) as f32,
        dims.height.saturating_sub(1) as f32,
    );
    p.to_vec2() * span
}

/// 1 inside `inner`, linear down to 0 at `outer`, 0 beyond.
fn feather_ramp(dist: f32, inner: f32, outer: f32) -> f32 {
    if dist <= inner {
        1.0
    } else if dist <= outer && outer > inner {
        1.0 - (dist - inner) / (outer - inner)
    } else {
        0.0
    }
}

pub fn circular(dims: Dimensions, settings: &CircularSettings) -> AlphaMap {
    let center = to_pixel(settings.center, dims);
    let base = settings.radius.max(0.0) * dims.min_side();
    let inner = base * (1.0 - settings.inner_feather / 100.0);
    let outer = base * (1.0 + settings.outer_feather / 100.0);

    AlphaMap::from_fn(dims, |x, y| {
        let dist = Vec2::new(x as f32, y as f32).distance(center);
        feather_ramp(dist, inner, outer)
    })
}

pub fn elliptical(dims: Dimensions, settings: &EllipticalSettings) -> AlphaMap {
    let center = to_pixel(settings.center, dims);
    let radii = Vec2::new(
        settings.radius_x * dims.width as f32,
        settings.radius_y * dims.height as f32,
    );
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return AlphaMap::zeros(dims);
    }
    let unrotate = Vec2::from_angle(-settings.rotation.to_radians());
    let inner = 1.0 - settings.inner_feather / 100.0;
    let outer = 1.0 + settings.outer_feather / 100.0;

    AlphaMap::from_fn(dims, |x, y| {
        let local = unrotate.rotate(Vec2::new(x as f32, y as f32) - center);
        let dist = (local / radii).length();
        feather_ramp(dist, inner, outer)
    })
}

pub fn rectangular(dims: Dimensions, settings: &RectangularSettings) -> AlphaMap {
    let origin = to_pixel(settings.position, dims);
    let size = Vec2::new(
        settings.size.width * dims.width as f32,
        settings.size.height * dims.height as f32,
    );
    if size.x <= 0.0 || size.y <= 0.0 {
        return AlphaMap::zeros(dims);
    }
    let half = size * 0.5;
    let center = origin + half;
    let unrotate = Vec2::from_angle(-settings.rotation.to_radians());
    let half_short = size.min_element() * 0.5;
    let corner = (settings.corner_radius / 100.0).clamp(0.0, 1.0) * half_short;
    let feather = settings.feather.max(0.0) / 100.0 * half_short;

    AlphaMap::from_fn(dims, |x, y| {
        let local = unrotate.rotate(Vec2::new(x as f32, y as f32) - center);
        let dist = rounded_rect_distance(local, half, corner);
        if dist <= 0.0 {
            1.0
        } else if feather > 0.0 && dist <= feather {
            1.0 - dist / feather
        } else {
            0.0
        }
    })
}

/// Signed distance from `p` (relative to the center) to a rounded rectangle.
/// Negative inside.
fn rounded_rect_distance(p: Vec2, half: Vec2, corner: f32) -> f32 {
    let q = p.abs() - half + Vec2::splat(corner);
    if q.x > 0.0 && q.y > 0.0 {
        q.length() - corner
    } else {
        q.max_element() - corner
    }
}

pub fn linear(dims: Dimensions, settings: &LinearSettings) -> AlphaMap {
    let start = to_pixel(settings.start, dims);
    let end = to_pixel(settings.end, dims);
    let axis = end - start;
    let length = axis.length();

    if length < 1.0 {
        return AlphaMap::filled(dims, 1.0);
    }

    let dir = axis / length;
    let midpoint = settings.midpoint.clamp(1e-4, 1.0 - 1e-4);

    AlphaMap::from_fn(dims, |x, y| {
        let t = (Vec2::new(x as f32, y as f32) - start).dot(dir) / length;
        let t = match settings.gradient_type {
            GradientType::Reflected => 1.0 - (t - midpoint).abs() * 2.0,
            GradientType::Linear if t < midpoint => t / midpoint * 0.5,
            GradientType::Linear => 0.5 + (t - midpoint) / (1.0 - midpoint) * 0.5,
        };
        t.clamp(0.0, 1.0)
    })
}
