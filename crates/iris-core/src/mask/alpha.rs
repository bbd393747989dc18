//! Dense per-pixel mask weights.

use crate::image::Dimensions;

/// One `f32` weight per pixel, row-major. Nominally `[0, 1]`; intermediate
/// refinement stages may leave values slightly outside that range.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMap {
    dims: Dimensions,
    values: Vec<f32>,
}

impl AlphaMap {
    /// An all-zero map (nothing selected).
    pub fn zeros(dims: Dimensions) -> Self {
        Self::filled(dims, 0.0)
    }

    pub fn filled(dims: Dimensions, value: f32) -> Self {
        Self {
            dims,
            values: vec![value; dims.pixel_count()],
        }
    }

    /// Wrap existing values. Returns `None` when the length does not match.
    pub fn from_values(dims: Dimensions, values: Vec<f32>) -> Option<Self> {
        (values.len() == dims.pixel_count()).then_some(Self { dims, values })
    }

    /// Build a map by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(dims: Dimensions, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut values = Vec::with_capacity(dims.pixel_count());
        for y in 0..dims.height {
            for x in 0..dims.width {
                values.push(f(x, y));
            }
        }
        Self { dims, values }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Weight at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.dims.width as usize + x as usize]
    }

    /// Edge-clamped lookup for convolution kernels.
    pub(crate) fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let cx = x.clamp(0, self.dims.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.dims.height as i64 - 1) as usize;
        self.values[cy * self.dims.width as usize + cx]
    }

    /// Apply `f` to every weight in place.
    pub fn map_in_place(&mut self, f: impl Fn(f32) -> f32) {
        for v in &mut self.values {
            *v = f(*v);
        }
    }

    /// True when every weight is below `epsilon`.
    pub fn is_empty_below(&self, epsilon: f32) -> bool {
        self.values.iter().all(|&v| v < epsilon)
    }
}
