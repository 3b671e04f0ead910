use mandelzoom_core::Mandelbrot;

/// Per-pixel escape counts for a full frame.
///
/// This is the raw output of the escape-time pass before coloring. Keeping
/// the counts separate from the colored raster lets each phase run as its
/// own parallel pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationBuffer {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    /// Row-major counts, each in `0..=max_iterations`.
    pub data: Vec<u32>,
}

impl IterationBuffer {
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            max_iterations,
            data: vec![max_iterations; size],
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Number of pixels whose orbit never escaped within the budget.
    pub fn interior_count(&self) -> usize {
        let engine = Mandelbrot::new(self.max_iterations);
        self.data.iter().filter(|&&n| engine.is_interior(n)).count()
    }
}
