use thiserror::Error;

/// Errors originating from the core fractal engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid plane window: {reason}")]
    InvalidWindow { reason: String },

    #[error("invalid viewport dimensions: {width}×{height} (both must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid magnification: {0} (must be finite and > 0)")]
    InvalidMagnification(f64),
}
