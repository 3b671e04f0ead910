use std::sync::Arc;

use tracing::debug;

use mandelzoom_core::{budget_for, Complex, PlaneWindow, Viewport};

use crate::frame::Frame;
use crate::palette::Palette;
use crate::renderer::{render, Overlay};
use crate::settings::SessionSettings;

/// Everything a frame render depends on, derived in one step from the
/// center and magnification.
///
/// A transition builds a fresh value instead of patching fields, so the
/// window, pixel ratios, budget and palette always agree with each other.
#[derive(Debug, Clone)]
pub struct RenderState {
    viewport: Viewport,
    magnification: f64,
    max_iterations: u32,
    palette: Arc<Palette>,
}

impl RenderState {
    /// The state at magnification 1, centred on the initial window.
    pub fn initial(settings: &SessionSettings) -> crate::Result<Self> {
        let viewport = Viewport::new(
            settings.initial_window,
            settings.width,
            settings.height,
            settings.insets,
        )?;
        Self::build(settings, viewport, settings.initial_window.center(), 1.0, None)
    }

    /// A new state centred on `center` at `magnification`.
    ///
    /// The palette is shared with `self` when the budget does not change.
    pub fn transition(
        &self,
        settings: &SessionSettings,
        center: Complex,
        magnification: f64,
    ) -> crate::Result<Self> {
        Self::build(settings, self.viewport, center, magnification, Some(self))
    }

    fn build(
        settings: &SessionSettings,
        viewport: Viewport,
        center: Complex,
        magnification: f64,
        previous: Option<&RenderState>,
    ) -> crate::Result<Self> {
        let initial = &settings.initial_window;
        let window =
            PlaneWindow::centered(center, initial.x_range(), initial.y_range(), magnification)?;
        let max_iterations = budget_for(magnification);
        let palette = match previous {
            Some(prev) if prev.max_iterations == max_iterations => Arc::clone(&prev.palette),
            _ => {
                let palette = Palette::build(max_iterations);
                debug!(max_iterations, entries = palette.len(), "Palette rebuilt");
                Arc::new(palette)
            }
        };
        Ok(Self {
            viewport: viewport.with_window(window),
            magnification,
            max_iterations,
            palette,
        })
    }

    pub fn render(&self, overlay: Overlay) -> Frame {
        render(
            &self.viewport,
            &self.palette,
            self.max_iterations,
            self.magnification,
            overlay,
        )
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn window(&self) -> &PlaneWindow {
        self.viewport.window()
    }

    pub fn center(&self) -> Complex {
        self.viewport.window().center()
    }

    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_starting_view() {
        let s = RenderState::initial(&SessionSettings::with_size(40, 20)).unwrap();
        assert_eq!(*s.window(), PlaneWindow::INITIAL);
        assert_eq!(s.magnification(), 1.0);
        assert_eq!(s.max_iterations(), 99);
        assert_eq!(s.palette().len(), 100);
    }

    #[test]
    fn transition_recomputes_everything() {
        let settings = SessionSettings::with_size(40, 20);
        let s = RenderState::initial(&settings).unwrap();
        let t = s
            .transition(&settings, Complex::new(-0.5, 0.5), 100.0)
            .unwrap();

        assert_eq!(t.max_iterations(), 202);
        assert_eq!(t.palette().len(), 203);
        assert!((t.window().x_range() - 0.04).abs() < 1e-12);
        assert!((t.viewport().pixel_ratio_x() - 1000.0).abs() < 1e-6);
        assert!((t.center().re + 0.5).abs() < 1e-12);
    }

    #[test]
    fn palette_shared_when_budget_unchanged() {
        let settings = SessionSettings::with_size(8, 4);
        let s = RenderState::initial(&settings).unwrap();
        let moved = s.transition(&settings, Complex::new(0.1, 0.1), 1.0).unwrap();
        assert!(Arc::ptr_eq(s.palette(), moved.palette()));

        let zoomed = s.transition(&settings, Complex::ZERO, 10.0).unwrap();
        assert!(!Arc::ptr_eq(s.palette(), zoomed.palette()));
    }
}
