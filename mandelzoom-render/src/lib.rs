pub mod animator;
pub mod error;
pub mod frame;
pub mod frame_store;
pub mod iteration_buffer;
pub mod palette;
pub mod playback;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod state;
pub mod worker;

pub use animator::{generate, prepare, ZoomGate, ZoomPlan, ZoomState, ZoomStep, ZoomTicket};
pub use error::RenderError;
pub use frame::{Frame, Raster};
pub use frame_store::FrameStore;
pub use iteration_buffer::IterationBuffer;
pub use palette::{hsb_to_rgb, Palette};
pub use playback::{Pacer, RecordingPacer, ThreadPacer};
pub use renderer::{compute_iterations, render, Overlay, AXIS_COLOR};
pub use session::{Command, SessionEvent, ZoomSession};
pub use settings::SessionSettings;
pub use state::RenderState;
pub use worker::{spawn_session, SessionHandle};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
