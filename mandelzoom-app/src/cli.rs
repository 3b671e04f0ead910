use clap::Parser;

use mandelzoom_core::Complex;

use crate::preferences::AppPreferences;

/// Generate Mandelbrot zoom animations without a display.
///
/// Example:
///   mandelzoom --target -0.75,0.1 --zooms 4 --frames-per-zoom 20
#[derive(Parser, Debug)]
#[command(name = "mandelzoom", version, about)]
pub struct Cli {
    /// Raster width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Raster height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Magnification multiplier per zoom request
    #[arg(long)]
    pub zoom_factor: Option<f64>,

    /// Pause between played-back frames, in milliseconds
    #[arg(long)]
    pub frame_delay: Option<u64>,

    /// Frames generated per zoom request
    #[arg(long)]
    pub frames_per_zoom: Option<u32>,

    /// Zoom target as `re,im`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub target: Option<Complex>,

    /// Number of zoom requests to issue
    #[arg(long)]
    pub zooms: Option<u32>,

    /// Replay every generated frame before exiting
    #[arg(long)]
    pub replay: bool,

    /// Write the effective settings back to preferences.json
    #[arg(long)]
    pub save_preferences: bool,
}

impl Cli {
    /// Overlay command-line values on top of stored preferences.
    pub fn apply(&self, prefs: &mut AppPreferences) {
        let session = &mut prefs.session;
        if let Some(v) = self.width {
            session.width = v;
        }
        if let Some(v) = self.height {
            session.height = v;
        }
        if let Some(v) = self.zoom_factor {
            session.zoom_factor = v;
        }
        if let Some(v) = self.frame_delay {
            session.frame_delay_ms = v;
        }
        if let Some(v) = self.frames_per_zoom {
            session.frames_per_zoom = v;
        }
        if let Some(v) = self.target {
            prefs.target = v;
        }
        if let Some(v) = self.zooms {
            prefs.zooms = v;
        }
        if self.replay {
            prefs.replay_at_exit = true;
        }
    }
}

pub fn parse_point(s: &str) -> Result<Complex, String> {
    let (re, im) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `re,im`, got `{s}`"))?;
    let re: f64 = re.trim().parse().map_err(|e| format!("real part: {e}"))?;
    let im: f64 = im.trim().parse().map_err(|e| format!("imaginary part: {e}"))?;
    let point = Complex::new(re, im);
    if !point.is_finite() {
        return Err(format!("point must be finite, got `{s}`"));
    }
    Ok(point)
}
