use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use mandelzoom_core::Complex;

use crate::error::RenderError;
use crate::frame_store::FrameStore;
use crate::renderer::Overlay;
use crate::settings::SessionSettings;
use crate::state::RenderState;

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Animator state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Idle,
    Generating,
}

/// Shared flag marking a zoom in progress.
///
/// Acquiring the gate yields a [`ZoomTicket`]; the gate reopens when the
/// ticket is dropped. A second request while a ticket is alive is refused
/// rather than queued.
#[derive(Debug, Default)]
pub struct ZoomGate {
    busy: AtomicBool,
}

impl ZoomGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(self: &Arc<Self>) -> crate::Result<ZoomTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RenderError::ZoomInProgress)?;
        Ok(ZoomTicket {
            gate: Arc::clone(self),
        })
    }

    pub fn state(&self) -> ZoomState {
        if self.busy.load(Ordering::Acquire) {
            ZoomState::Generating
        } else {
            ZoomState::Idle
        }
    }
}

/// Proof that the holder owns the zoom gate.
#[derive(Debug)]
pub struct ZoomTicket {
    gate: Arc<ZoomGate>,
}

impl Drop for ZoomTicket {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One intermediate frame of a zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep {
    /// 1-based step number.
    pub index: u32,
    /// `index / frames`, in `(0, 1]`.
    pub progress: f64,
    pub magnification: f64,
}

/// The magnifications visited by one zoom request.
///
/// Steps interpolate geometrically, `m_k = m₀ · factor^(k / frames)`, so
/// the perceived zoom speed is uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPlan {
    pub target: Complex,
    pub start_magnification: f64,
    pub zoom_factor: f64,
    pub frames: u32,
}

impl ZoomPlan {
    pub fn steps(&self) -> impl Iterator<Item = ZoomStep> + '_ {
        (1..=self.frames).map(move |k| {
            let progress = k as f64 / self.frames as f64;
            ZoomStep {
                index: k,
                progress,
                magnification: self.start_magnification * self.zoom_factor.powf(progress),
            }
        })
    }

    /// Magnification once the zoom completes.
    pub fn end_magnification(&self) -> f64 {
        self.start_magnification * self.zoom_factor
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Derive the render state of every step of `plan`, starting from `from`.
///
/// Fails without side effects if any step's window cannot be represented,
/// e.g. when the zoom factor shrinks the window below `f64` resolution.
pub fn prepare(
    plan: &ZoomPlan,
    from: &RenderState,
    settings: &SessionSettings,
) -> crate::Result<Vec<(ZoomStep, RenderState)>> {
    let mut prepared = Vec::with_capacity(plan.frames as usize);
    let mut state = from.clone();
    for step in plan.steps() {
        state = state.transition(settings, plan.target, step.magnification)?;
        prepared.push((step, state.clone()));
    }
    Ok(prepared)
}

/// Render every step of `plan` and append the frames to `store`.
///
/// All step states are derived before the first frame is rendered, so a
/// failing plan leaves `store` untouched. Steps run sequentially because
/// each one derives its own budget, palette and window; the per-frame work
/// inside a step is parallel. `on_step` is called after each frame is
/// stored. Returns the state at the last step, or `from` for an empty plan.
pub fn generate(
    _ticket: &ZoomTicket,
    plan: &ZoomPlan,
    from: &RenderState,
    settings: &SessionSettings,
    store: &mut FrameStore,
    mut on_step: impl FnMut(&ZoomStep, usize),
) -> crate::Result<RenderState> {
    let prepared = prepare(plan, from, settings)?;
    let start = Instant::now();
    let overlay = Overlay {
        draw_axes: settings.draw_axes,
    };
    let mut state = from.clone();

    for (step, next) in prepared {
        state = next;
        let index = store.append(state.render(overlay));
        debug!(
            step = step.index,
            index,
            magnification = step.magnification,
            max_iterations = state.max_iterations(),
            "Zoom frame generated"
        );
        on_step(&step, index);
    }

    info!(
        frames = plan.frames,
        target = %plan.target,
        magnification = plan.end_magnification(),
        elapsed_ms = start.elapsed().as_millis(),
        "Zoom generated"
    );
    Ok(state)
}
