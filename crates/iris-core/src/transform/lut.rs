//! 256-entry tone curve lookup tables built from sparse control points.
//!
//! # Algorithm
//! Points are stably sorted by x. For every input level `i` the first adjacent
//! pair with `p1.x <= i <= p2.x` wins (linear scan), and y is linearly
//! interpolated between them. Levels left of the first point or right of the
//! last take that boundary point's y.
//!
//! ```text
//! lut[i] = clamp(round(p1.y + (i − p1.x) / (p2.x − p1.x) × (p2.y − p1.y)), 0, 255)
//! ```
//!
//! # Complexity
//! Build: O(N log N + 256 × N). Lookup: O(1).

use serde::{Deserialize, Serialize};

/// A control point on a 0–255 tone curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl CurvePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The two boundary points of a neutral curve.
pub fn identity_points() -> Vec<CurvePoint> {
    vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(255.0, 255.0)]
}

/// A baked 8-bit lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveLut([u8; 256]);

impl CurveLut {
    /// The identity table.
    pub fn identity() -> Self {
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self(table)
    }

    /// Bake a table from an unordered list of control points.
    ///
    /// An empty list produces the identity; a single point produces a constant.
    pub fn build(points: &[CurvePoint]) -> Self {
        let mut sorted: Vec<CurvePoint> = points
            .iter()
            .copied()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        if sorted.is_empty() {
            return Self::identity();
        }
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        let first = sorted[0];
        let last = sorted[sorted.len() - 1];
        let mut table = [0u8; 256];

        for (i, slot) in table.iter_mut().enumerate() {
            let level = i as f32;
            let y = if level <= first.x {
                first.y
            } else if level >= last.x {
                last.y
            } else {
                interpolate(&sorted, level)
            };
            *slot = y.round().clamp(0.0, 255.0) as u8;
        }
        Self(table)
    }

    /// Look up a single level.
    #[inline]
    pub fn apply(&self, level: u8) -> u8 {
        self.0[level as usize]
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| v as usize == i)
    }

    pub fn as_table(&self) -> &[u8; 256] {
        &self.0
    }
}

impl Default for CurveLut {
    fn default() -> Self {
        Self::identity()
    }
}

/// Interpolate inside the point range. First matching segment wins.
fn interpolate(sorted: &[CurvePoint], level: f32) -> f32 {
    for pair in sorted.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        if p1.x <= level && level <= p2.x {
            if p2.x == p1.x {
                return p1.y;
            }
            let t = (level - p1.x) / (p2.x - p1.x);
            return p1.y + t * (p2.y - p1.y);
        }
    }
    // Unreachable for levels strictly inside [first.x, last.x].
    sorted[0].y
}
