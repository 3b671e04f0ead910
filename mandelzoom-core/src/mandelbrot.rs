use crate::complex::Complex;

/// Squared escape radius. Comparing `|z|²` against it avoids a square root.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Escape-time iteration of `z ← z² + c` starting from `z₀ = c`.
///
/// Returns the number of steps taken before `|z|² ≥ 4`, capped at
/// `max_iterations`. A result equal to `max_iterations` means the point is
/// assumed to lie inside the set.
#[inline]
pub fn iterate(re: f64, im: f64, max_iterations: u32) -> u32 {
    let c = Complex::new(re, im);
    let mut z = c;
    let mut n = 0;
    while z.norm_sq() < ESCAPE_RADIUS_SQ && n < max_iterations {
        n += 1;
        z = z.square() + c;
    }
    n
}

/// The Mandelbrot escape-time engine bound to one iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mandelbrot {
    max_iterations: u32,
}

impl Mandelbrot {
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[inline]
    pub fn iterate(&self, c: Complex) -> u32 {
        iterate(c.re, c.im, self.max_iterations)
    }

    /// `true` if `count` is the "never escaped" sentinel for this budget.
    #[inline]
    pub fn is_interior(&self, count: u32) -> bool {
        count >= self.max_iterations
    }
}
