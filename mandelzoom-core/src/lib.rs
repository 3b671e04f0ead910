pub mod complex;
pub mod error;
pub mod mandelbrot;
pub mod policy;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use mandelbrot::{iterate, Mandelbrot};
pub use policy::{budget_for, MAX_ZOOM};
pub use viewport::{BorderInsets, PlaneWindow, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
