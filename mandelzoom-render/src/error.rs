use thiserror::Error;

/// Errors originating from the rendering and zoom pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("frame index {index} out of range (last frame is {last})")]
    OutOfRange { index: usize, last: usize },

    #[error("zoom refused: magnification {magnification:e} is at the precision ceiling")]
    ZoomAtCeiling { magnification: f64 },

    #[error("zoom refused: another zoom is still in progress")]
    ZoomInProgress,

    #[error("center {re} + {im}i lies outside the visible window")]
    CenterOutOfBounds { re: f64, im: f64 },

    #[error("session worker has stopped")]
    WorkerStopped,

    #[error("failed to start session worker: {0}")]
    WorkerSpawn(String),

    #[error(transparent)]
    Core(#[from] mandelzoom_core::CoreError),
}

impl RenderError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }

    /// Rejections a caller may treat as a silent no-op.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::ZoomAtCeiling { .. } | Self::ZoomInProgress)
    }
}
