use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use mandelzoom_core::{Mandelbrot, Viewport};

use crate::frame::{Frame, Raster};
use crate::iteration_buffer::IterationBuffer;
use crate::palette::Palette;

/// Axis line color.
pub const AXIS_COLOR: [u8; 4] = [255, 255, 0, 255];

/// Extra drawing applied on top of the colorized frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlay {
    /// Draw the real and imaginary axes where they cross the frame.
    pub draw_axes: bool,
}

// ---------------------------------------------------------------------------
// Escape-time pass
// ---------------------------------------------------------------------------

/// Compute the escape count of every pixel in the viewport.
///
/// Rows are processed in parallel via Rayon. Each pixel depends only on its
/// own plane coordinate and the budget, so the result does not depend on
/// scheduling.
pub fn compute_iterations(viewport: &Viewport, max_iterations: u32) -> IterationBuffer {
    let engine = Mandelbrot::new(max_iterations);
    let mut buffer = IterationBuffer::new(viewport.width(), viewport.height(), max_iterations);
    let width = viewport.width() as usize;

    buffer
        .data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, count) in row.iter_mut().enumerate() {
                *count = engine.iterate(viewport.pixel_to_complex(px as u32, py as u32));
            }
        });

    buffer
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

/// Render one complete frame: escape counts, palette lookup, overlay.
///
/// Pure with respect to its inputs; nothing shared is mutated.
pub fn render(
    viewport: &Viewport,
    palette: &Palette,
    max_iterations: u32,
    magnification: f64,
    overlay: Overlay,
) -> Frame {
    let start = Instant::now();

    let iterations = compute_iterations(viewport, max_iterations);
    let mut raster = palette.colorize(&iterations);
    if overlay.draw_axes {
        draw_axes(&mut raster, viewport);
    }

    debug!(
        elapsed_ms = start.elapsed().as_millis(),
        width = viewport.width(),
        height = viewport.height(),
        interior = iterations.interior_count(),
        max_iterations,
        magnification,
        "Frame rendered"
    );

    Frame {
        raster,
        magnification,
        window: *viewport.window(),
        max_iterations,
    }
}

/// Draw the imaginary axis at column `x_stagger` and the real axis at row
/// `y_stagger`, skipping either one when it falls outside the raster.
fn draw_axes(raster: &mut Raster, viewport: &Viewport) {
    let xs = viewport.x_stagger();
    if xs >= 0.0 && xs < raster.width as f64 {
        let col = xs as u32;
        for y in 0..raster.height {
            raster.set_pixel(col, y, AXIS_COLOR);
        }
    }

    let ys = viewport.y_stagger();
    if ys >= 0.0 && ys < raster.height as f64 {
        let row = ys as u32;
        for x in 0..raster.width {
            raster.set_pixel(x, row, AXIS_COLOR);
        }
    }
}
