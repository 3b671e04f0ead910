use rayon::prelude::*;

use crate::frame::Raster;
use crate::iteration_buffer::IterationBuffer;

/// Hue endpoints on a 0–255 scale. Low iteration counts start at `HUE_MAX`
/// and sweep linearly toward `HUE_MIN` as the count approaches the budget.
const HUE_MAX: f32 = 175.0;
const HUE_MIN: f32 = 255.0;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Iteration-count lookup table: one RGBA color per count in
/// `0..=max_iterations`.
///
/// Saturation and brightness fall to zero as the count approaches the
/// budget, so the final entry (points that never escaped) is black.
/// A palette is rebuilt whenever the budget changes and never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    max_iterations: u32,
    colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn build(max_iterations: u32) -> Self {
        let colors = (0..=max_iterations)
            .map(|i| {
                let quotient = if max_iterations == 0 {
                    1.0
                } else {
                    i as f64 / max_iterations as f64
                };
                let hue = (HUE_MAX as f64 - (HUE_MAX - HUE_MIN) as f64 * quotient) as f32 / 255.0;
                let level = (1.0 - quotient) as f32;
                hsb_to_rgb(hue, level, level)
            })
            .collect();
        Self {
            max_iterations,
            colors,
        }
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Number of entries, always `max_iterations + 1`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Color for an iteration count. Counts past the budget use the
    /// interior color.
    #[inline]
    pub fn color(&self, iterations: u32) -> [u8; 4] {
        let idx = (iterations as usize).min(self.colors.len() - 1);
        self.colors[idx]
    }

    /// Colorize an entire iteration buffer into an RGBA raster.
    pub fn colorize(&self, iter_buf: &IterationBuffer) -> Raster {
        let mut pixels = vec![0u8; iter_buf.data.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(iter_buf.data.par_iter())
            .for_each(|(pixel, &count)| pixel.copy_from_slice(&self.color(count)));
        Raster {
            width: iter_buf.width,
            height: iter_buf.height,
            pixels,
        }
    }
}

// ---------------------------------------------------------------------------
// HSB → RGB
// ---------------------------------------------------------------------------

/// Standard hue/saturation/brightness conversion, all inputs in `0..=1`.
///
/// Only the fractional part of `hue` is used, so `1.0` wraps to red.
/// Channels are rounded with `x * 255 + 0.5` truncation.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> [u8; 4] {
    let to_byte = |x: f32| (x * 255.0 + 0.5) as u8;

    if saturation == 0.0 {
        let v = to_byte(brightness);
        return [v, v, v, 255];
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match h as u32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    [to_byte(r), to_byte(g), to_byte(b), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(c: [u8; 4]) -> u32 {
        c[0] as u32 + c[1] as u32 + c[2] as u32
    }

    fn saturation(c: [u8; 4]) -> u8 {
        let max = c[0].max(c[1]).max(c[2]);
        let min = c[0].min(c[1]).min(c[2]);
        max - min
    }

    #[test]
    fn palette_has_budget_plus_one_entries() {
        for n in [0, 1, 99, 147, 862] {
            let p = Palette::build(n);
            assert_eq!(p.len(), n as usize + 1);
            assert_eq!(p.max_iterations(), n);
        }
    }

    #[test]
    fn interior_entry_is_black() {
        let p = Palette::build(200);
        assert_eq!(p.color(200), [0, 0, 0, 255]);
    }

    #[test]
    fn interior_entry_is_darkest_and_least_saturated() {
        let p = Palette::build(147);
        let last = p.color(147);
        for c in (0..=147).map(|i| p.color(i)) {
            assert!(luma(last) <= luma(c));
            assert!(saturation(last) <= saturation(c));
        }
    }

    #[test]
    fn first_entry_is_bright_blue_violet() {
        // hue 175/255, full saturation and brightness.
        assert_eq!(Palette::build(99).color(0), [30, 0, 255, 255]);
    }

    #[test]
    fn counts_past_budget_clamp_to_interior() {
        let p = Palette::build(10);
        assert_eq!(p.color(10_000), p.color(10));
    }

    #[test]
    fn hsb_primaries() {
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), [255, 0, 0, 255]);
        assert_eq!(hsb_to_rgb(1.0 / 3.0, 1.0, 1.0), [0, 255, 0, 255]);
        assert_eq!(hsb_to_rgb(2.0 / 3.0, 1.0, 1.0), [0, 0, 255, 255]);
        assert_eq!(hsb_to_rgb(1.0, 1.0, 1.0), [255, 0, 0, 255]);
    }

    #[test]
    fn hsb_grey_when_unsaturated() {
        assert_eq!(hsb_to_rgb(0.4, 0.0, 0.5), [128, 128, 128, 255]);
        assert_eq!(hsb_to_rgb(0.9, 0.0, 0.0), [0, 0, 0, 255]);
    }

    #[test]
    fn colorize_maps_every_count() {
        let p = Palette::build(4);
        let buf = IterationBuffer {
            width: 2,
            height: 2,
            max_iterations: 4,
            data: vec![0, 1, 4, 2],
        };
        let raster = p.colorize(&buf);
        assert_eq!(raster.pixels.len(), 16);
        assert_eq!(&raster.pixels[0..4], &p.color(0));
        assert_eq!(&raster.pixels[8..12], &[0, 0, 0, 255]);
        assert_eq!(raster.pixel(1, 1), p.color(2));
    }
}
