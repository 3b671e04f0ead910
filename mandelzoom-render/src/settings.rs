use std::time::Duration;

use serde::{Deserialize, Serialize};

use mandelzoom_core::{BorderInsets, PlaneWindow};

use crate::error::RenderError;

/// Everything needed to start a zoom session.
///
/// Missing fields fall back to their defaults on deserialization, so a
/// partial settings file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Magnification multiplier applied by one zoom request.
    pub zoom_factor: f64,
    /// Pause between frames during playback.
    pub frame_delay_ms: u64,
    /// Frames generated per zoom request.
    pub frames_per_zoom: u32,
    /// View at magnification 1. Its extent is divided by the magnification
    /// for every later frame.
    pub initial_window: PlaneWindow,
    pub insets: BorderInsets,
    pub draw_axes: bool,
}

impl SessionSettings {
    pub const DEFAULT_ZOOM_FACTOR: f64 = 10.0;
    pub const DEFAULT_FRAME_DELAY_MS: u64 = 100;
    pub const DEFAULT_FRAMES_PER_ZOOM: u32 = 10;

    /// Default settings at a custom raster size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 {
            return Err(RenderError::invalid("width", self.width));
        }
        if self.height == 0 {
            return Err(RenderError::invalid("height", self.height));
        }
        check_zoom_factor(self.zoom_factor)?;
        check_frame_delay(self.frame_delay_ms)?;
        check_frames_per_zoom(self.frames_per_zoom)?;
        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        // A 2:1 raster matching the 4 × 2 starting window.
        Self {
            width: 1200,
            height: 600,
            zoom_factor: Self::DEFAULT_ZOOM_FACTOR,
            frame_delay_ms: Self::DEFAULT_FRAME_DELAY_MS,
            frames_per_zoom: Self::DEFAULT_FRAMES_PER_ZOOM,
            initial_window: PlaneWindow::INITIAL,
            insets: BorderInsets::default(),
            draw_axes: true,
        }
    }
}

pub fn check_zoom_factor(value: f64) -> crate::Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RenderError::invalid("zoom factor", value));
    }
    Ok(())
}

pub fn check_frame_delay(ms: u64) -> crate::Result<()> {
    if ms == 0 {
        return Err(RenderError::invalid("frame delay", ms));
    }
    Ok(())
}

pub fn check_frames_per_zoom(n: u32) -> crate::Result<()> {
    if n == 0 {
        return Err(RenderError::invalid("frames per zoom", n));
    }
    Ok(())
}
