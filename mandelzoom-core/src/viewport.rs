use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Plane window
// ---------------------------------------------------------------------------

/// The rectangle of the complex plane currently visible.
///
/// Always satisfies `x_max > x_min` and `y_max > y_min` with finite bounds;
/// the only ways to obtain one are the validating constructors (including
/// deserialization, which goes through the same checks).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct PlaneWindow {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

#[derive(Deserialize)]
struct RawWindow {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl TryFrom<RawWindow> for PlaneWindow {
    type Error = CoreError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.x_min, raw.x_max, raw.y_min, raw.y_max)
    }
}

impl PlaneWindow {
    /// The full starting view, `[-2, 2] × [-1, 1]`.
    pub const INITIAL: Self = Self {
        x_min: -2.0,
        x_max: 2.0,
        y_min: -1.0,
        y_max: 1.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidWindow {
                reason: format!("bounds must be finite, got [{x_min}, {x_max}] × [{y_min}, {y_max}]"),
            });
        }
        if x_max <= x_min || y_max <= y_min {
            return Err(CoreError::InvalidWindow {
                reason: format!("empty range [{x_min}, {x_max}] × [{y_min}, {y_max}]"),
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// A window centred on `center` whose extent is the starting extent
    /// divided by `magnification`.
    ///
    /// Half-widths are `(x_range / 2) / magnification`, so the bounds
    /// shrink hyperbolically as magnification grows.
    pub fn centered(
        center: Complex,
        x_range: f64,
        y_range: f64,
        magnification: f64,
    ) -> crate::Result<Self> {
        if !magnification.is_finite() || magnification <= 0.0 {
            return Err(CoreError::InvalidMagnification(magnification));
        }
        let half_x = (x_range / 2.0) / magnification;
        let half_y = (y_range / 2.0) / magnification;
        Self::new(
            center.re - half_x,
            center.re + half_x,
            center.im - half_y,
            center.im + half_y,
        )
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    #[inline]
    pub fn x_range(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn y_range(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Complex {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// `true` if `c` lies strictly inside the window (edges excluded).
    pub fn contains(&self, c: Complex) -> bool {
        c.re > self.x_min && c.re < self.x_max && c.im > self.y_min && c.im < self.y_max
    }
}

impl Default for PlaneWindow {
    fn default() -> Self {
        Self::INITIAL
    }
}

// ---------------------------------------------------------------------------
// Border insets
// ---------------------------------------------------------------------------

/// Offset of the raster inside the presentation surface, in pixels.
///
/// Screen coordinates reported by a window include its decorations; the
/// insets are subtracted before mapping to the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BorderInsets {
    #[serde(default)]
    pub left: u32,
    #[serde(default)]
    pub top: u32,
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Maps between raster pixels and the complex plane.
///
/// The derived ratios and staggers are computed once in the constructor
/// from the window and pixel size; a new window always means a new
/// viewport, so they can never go stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    window: PlaneWindow,
    width: u32,
    height: u32,
    insets: BorderInsets,

    /// Pixels per plane unit along each axis.
    pixel_ratio_x: f64,
    pixel_ratio_y: f64,

    /// Pixel position of the plane origin.
    x_stagger: f64,
    y_stagger: f64,
}

impl Viewport {
    pub fn new(
        window: PlaneWindow,
        width: u32,
        height: u32,
        insets: BorderInsets,
    ) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self::build(window, width, height, insets))
    }

    fn build(window: PlaneWindow, width: u32, height: u32, insets: BorderInsets) -> Self {
        let pixel_ratio_x = width as f64 / window.x_range();
        let pixel_ratio_y = height as f64 / window.y_range();
        let center = window.center();
        Self {
            window,
            width,
            height,
            insets,
            pixel_ratio_x,
            pixel_ratio_y,
            x_stagger: width as f64 / 2.0 - center.re * pixel_ratio_x,
            y_stagger: height as f64 / 2.0 + center.im * pixel_ratio_y,
        }
    }

    /// Same pixel size and insets, different window.
    pub fn with_window(&self, window: PlaneWindow) -> Self {
        Self::build(window, self.width, self.height, self.insets)
    }

    pub fn window(&self) -> &PlaneWindow {
        &self.window
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn insets(&self) -> BorderInsets {
        self.insets
    }

    pub fn pixel_ratio_x(&self) -> f64 {
        self.pixel_ratio_x
    }

    pub fn pixel_ratio_y(&self) -> f64 {
        self.pixel_ratio_y
    }

    pub fn x_stagger(&self) -> f64 {
        self.x_stagger
    }

    pub fn y_stagger(&self) -> f64 {
        self.y_stagger
    }

    /// Plane coordinate sampled for raster pixel `(px, py)`.
    ///
    /// `(0, 0)` is the top-left pixel; pixel-y grows downward while the
    /// imaginary axis grows upward.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32) -> Complex {
        Complex::new(
            (px as f64 - self.x_stagger) / self.pixel_ratio_x,
            -(py as f64 - self.y_stagger) / self.pixel_ratio_y,
        )
    }

    /// Map fractional raster coordinates to the plane.
    pub fn pixel_to_plane(&self, px: f64, py: f64) -> Complex {
        let w = &self.window;
        Complex::new(
            w.x_min + px / self.width as f64 * w.x_range(),
            w.y_min + (self.height as f64 - py) / self.height as f64 * w.y_range(),
        )
    }

    /// Map a plane point to fractional raster coordinates.
    pub fn plane_to_pixel(&self, c: Complex) -> (f64, f64) {
        let w = &self.window;
        (
            (c.re - w.x_min) / w.x_range() * self.width as f64,
            self.height as f64 - (c.im - w.y_min) / w.y_range() * self.height as f64,
        )
    }

    /// Map a presentation-surface position (raster plus insets) to the plane.
    pub fn screen_to_plane(&self, sx: f64, sy: f64) -> Complex {
        self.pixel_to_plane(sx - self.insets.left as f64, sy - self.insets.top as f64)
    }

    /// Map a plane point to a presentation-surface position.
    pub fn plane_to_screen(&self, c: Complex) -> (f64, f64) {
        let (px, py) = self.plane_to_pixel(c);
        (px + self.insets.left as f64, py + self.insets.top as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn vp(width: u32, height: u32) -> Viewport {
        Viewport::new(PlaneWindow::INITIAL, width, height, BorderInsets::default()).unwrap()
    }

    #[test]
    fn initial_window_ranges() {
        let w = PlaneWindow::default();
        assert_eq!(w.x_range(), 4.0);
        assert_eq!(w.y_range(), 2.0);
        assert_eq!(w.center(), Complex::ZERO);
    }

    #[test]
    fn invalid_windows_rejected() {
        assert!(PlaneWindow::new(1.0, 1.0, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(-1.0, 1.0, 2.0, -2.0).is_err());
        assert!(PlaneWindow::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(-1.0, f64::INFINITY, -1.0, 1.0).is_err());
    }

    #[test]
    fn centered_window_shrinks_with_magnification() {
        let c = Complex::new(-0.5, 0.25);
        let w = PlaneWindow::centered(c, 4.0, 2.0, 10.0).unwrap();
        assert!((w.x_range() - 0.4).abs() < EPSILON);
        assert!((w.y_range() - 0.2).abs() < EPSILON);
        assert!((w.center().re - c.re).abs() < EPSILON);
        assert!((w.center().im - c.im).abs() < EPSILON);
    }

    #[test]
    fn centered_rejects_non_positive_magnification() {
        assert_eq!(
            PlaneWindow::centered(Complex::ZERO, 4.0, 2.0, 0.0),
            Err(CoreError::InvalidMagnification(0.0))
        );
        assert!(PlaneWindow::centered(Complex::ZERO, 4.0, 2.0, -2.0).is_err());
        assert!(PlaneWindow::centered(Complex::ZERO, 4.0, 2.0, f64::NAN).is_err());
    }

    #[test]
    fn contains_excludes_edges() {
        let w = PlaneWindow::INITIAL;
        assert!(w.contains(Complex::new(1.9, -0.9)));
        assert!(!w.contains(Complex::new(2.0, 0.0)));
        assert!(!w.contains(Complex::new(0.0, -1.0)));
    }

    #[test]
    fn invalid_dimensions() {
        let w = PlaneWindow::INITIAL;
        assert!(Viewport::new(w, 0, 100, BorderInsets::default()).is_err());
        assert!(Viewport::new(w, 100, 0, BorderInsets::default()).is_err());
    }

    #[test]
    fn corners_map_to_bounds() {
        let v = vp(400, 200);
        let tl = v.pixel_to_plane(0.0, 0.0);
        assert!((tl.re + 2.0).abs() < EPSILON);
        assert!((tl.im - 1.0).abs() < EPSILON);

        let br = v.pixel_to_plane(400.0, 200.0);
        assert!((br.re - 2.0).abs() < EPSILON);
        assert!((br.im + 1.0).abs() < EPSILON);

        let (px, py) = v.plane_to_pixel(Complex::ZERO);
        assert!((px - 200.0).abs() < EPSILON);
        assert!((py - 100.0).abs() < EPSILON);
    }

    #[test]
    fn stagger_sampling_matches_inverse_mapping() {
        let w = PlaneWindow::centered(Complex::new(-0.75, 0.1), 4.0, 2.0, 37.0).unwrap();
        let v = Viewport::new(w, 120, 60, BorderInsets::default()).unwrap();
        for (px, py) in [(0, 0), (17, 42), (119, 59), (60, 30)] {
            let a = v.pixel_to_complex(px, py);
            let b = v.pixel_to_plane(px as f64, py as f64);
            assert!((a.re - b.re).abs() < 1e-12, "re mismatch at ({px}, {py})");
            assert!((a.im - b.im).abs() < 1e-12, "im mismatch at ({px}, {py})");
        }
    }

    #[test]
    fn pixel_round_trip() {
        let w = PlaneWindow::centered(Complex::new(0.3, -0.4), 4.0, 2.0, 1234.5).unwrap();
        let v = Viewport::new(w, 300, 150, BorderInsets::default()).unwrap();
        for py in (0..150).step_by(7) {
            for px in (0..300).step_by(11) {
                let c = v.pixel_to_plane(px as f64, py as f64);
                let (rx, ry) = v.plane_to_pixel(c);
                assert!((rx - px as f64).abs() < 1e-6);
                assert!((ry - py as f64).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn screen_mapping_subtracts_insets() {
        let insets = BorderInsets { left: 8, top: 31 };
        let v = Viewport::new(PlaneWindow::INITIAL, 400, 200, insets).unwrap();
        let c = v.screen_to_plane(208.0, 131.0);
        assert!(c.re.abs() < EPSILON);
        assert!(c.im.abs() < EPSILON);

        let (sx, sy) = v.plane_to_screen(Complex::new(-2.0, 1.0));
        assert!((sx - 8.0).abs() < EPSILON);
        assert!((sy - 31.0).abs() < EPSILON);
    }

    #[test]
    fn with_window_recomputes_derived_fields() {
        let v = vp(400, 200);
        let zoomed = v.with_window(PlaneWindow::centered(Complex::new(1.0, 0.5), 4.0, 2.0, 4.0).unwrap());
        assert_eq!(zoomed.width(), 400);
        assert!((zoomed.pixel_ratio_x() - 400.0).abs() < EPSILON);
        assert!((zoomed.pixel_ratio_x() - v.pixel_ratio_x() * 4.0).abs() < EPSILON);
        let c = zoomed.pixel_to_complex(200, 100);
        assert!((c.re - 1.0).abs() < EPSILON);
        assert!((c.im - 0.5).abs() < EPSILON);
    }
}
