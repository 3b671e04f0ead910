use std::ops::RangeInclusive;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use mandelzoom_core::{Complex, PlaneWindow, MAX_ZOOM};

use crate::animator::{generate, ZoomGate, ZoomPlan, ZoomState, ZoomTicket};
use crate::error::RenderError;
use crate::frame::Frame;
use crate::frame_store::FrameStore;
use crate::playback::Pacer;
use crate::renderer::Overlay;
use crate::settings::{
    check_frame_delay, check_frames_per_zoom, check_zoom_factor, SessionSettings,
};
use crate::state::RenderState;

// ---------------------------------------------------------------------------
// Commands and events
// ---------------------------------------------------------------------------

/// Every action a presentation layer can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Zoom(Complex),
    SetCenter(Complex),
    SetZoomFactor(f64),
    SetFrameDelay(u64),
    SetFramesPerZoom(u32),
    DisplayFrame(usize),
    NextFrame,
    PreviousFrame,
    LastFrame,
    ReplayAll,
    ReplayLast,
}

/// Notifications sent to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ZoomStarted {
        target: Complex,
        from: f64,
        to: f64,
    },
    /// One zoom frame finished; `fraction` is `step / frames`.
    Progress {
        step: u32,
        frames: u32,
        fraction: f64,
    },
    ZoomFinished {
        magnification: f64,
        last: usize,
    },
    ZoomRejected {
        error: RenderError,
    },
    /// The cursor moved. "Previous" is meaningful while `displayed > 0`,
    /// "next" while `displayed < last`.
    DisplayedFrame {
        displayed: usize,
        last: usize,
    },
    PlaybackFinished,
    CommandFailed {
        command: Command,
        error: RenderError,
    },
}

impl SessionEvent {
    /// Progress as a whole percentage, truncated so 100 means done.
    pub fn percent(&self) -> Option<u8> {
        match self {
            Self::Progress { fraction, .. } => Some((fraction * 100.0) as u8),
            _ => None,
        }
    }
}

fn broadcast(subscribers: &mut Vec<mpsc::Sender<SessionEvent>>, event: SessionEvent) {
    subscribers.retain(|tx| tx.send(event.clone()).is_ok());
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A running zoom session: current view, rendered frames, and playback.
///
/// All operations are synchronous. Zooms are serialised through a
/// [`ZoomGate`]; a request while one is generating is refused.
pub struct ZoomSession {
    settings: SessionSettings,
    state: RenderState,
    store: FrameStore,
    gate: Arc<ZoomGate>,
    subscribers: Vec<mpsc::Sender<SessionEvent>>,
}

impl ZoomSession {
    /// Validate `settings` and render the starting frame.
    pub fn new(settings: SessionSettings) -> crate::Result<Self> {
        settings.validate()?;
        let state = RenderState::initial(&settings)?;
        let mut store = FrameStore::new();
        store.append(state.render(overlay(&settings)));

        info!(
            width = settings.width,
            height = settings.height,
            zoom_factor = settings.zoom_factor,
            frames_per_zoom = settings.frames_per_zoom,
            max_iterations = state.max_iterations(),
            "Session initialized"
        );

        Ok(Self {
            settings,
            state,
            store,
            gate: Arc::new(ZoomGate::new()),
            subscribers: Vec::new(),
        })
    }

    /// Register for session events. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.add_subscriber(tx);
        rx
    }

    pub(crate) fn add_subscriber(&mut self, tx: mpsc::Sender<SessionEvent>) {
        self.subscribers.push(tx);
    }

    pub(crate) fn emit(&mut self, event: SessionEvent) {
        broadcast(&mut self.subscribers, event);
    }

    fn notify_displayed(&mut self) {
        let event = SessionEvent::DisplayedFrame {
            displayed: self.store.displayed(),
            last: self.store.last_index(),
        };
        self.emit(event);
    }

    // -- Zoom ---------------------------------------------------------------

    /// Zoom toward `target` by the configured factor, appending
    /// `frames_per_zoom` frames. Returns the number of frames added.
    ///
    /// Refused with `ZoomAtCeiling` once the magnification reaches
    /// [`MAX_ZOOM`], and with `ZoomInProgress` while another zoom holds the
    /// gate. A zoom whose steps shrink the window below `f64` resolution is
    /// refused before any frame is rendered. Every refusal leaves the
    /// session unchanged.
    pub fn request_zoom(&mut self, target: Complex) -> crate::Result<usize> {
        let ticket = match self.gate.try_acquire() {
            Ok(ticket) => ticket,
            Err(error) => {
                warn!(%target, "Zoom request refused: zoom in progress");
                self.emit(SessionEvent::ZoomRejected {
                    error: error.clone(),
                });
                return Err(error);
            }
        };
        self.zoom_with_ticket(target, &ticket)
    }

    pub(crate) fn zoom_with_ticket(
        &mut self,
        target: Complex,
        ticket: &ZoomTicket,
    ) -> crate::Result<usize> {
        let magnification = self.state.magnification();
        if magnification >= MAX_ZOOM {
            let error = RenderError::ZoomAtCeiling { magnification };
            warn!(magnification, "Zoom request refused: precision ceiling reached");
            self.emit(SessionEvent::ZoomRejected {
                error: error.clone(),
            });
            return Err(error);
        }
        if !target.is_finite() {
            return Err(RenderError::invalid("zoom target", target));
        }

        let plan = ZoomPlan {
            target,
            start_magnification: magnification,
            zoom_factor: self.settings.zoom_factor,
            frames: self.settings.frames_per_zoom,
        };
        self.emit(SessionEvent::ZoomStarted {
            target,
            from: magnification,
            to: plan.end_magnification(),
        });

        let subscribers = &mut self.subscribers;
        let generated = generate(
            ticket,
            &plan,
            &self.state,
            &self.settings,
            &mut self.store,
            |step, _| {
                broadcast(
                    subscribers,
                    SessionEvent::Progress {
                        step: step.index,
                        frames: plan.frames,
                        fraction: step.progress,
                    },
                )
            },
        );
        let end = match generated {
            Ok(end) => end,
            Err(error) => {
                warn!(%target, "Zoom request refused: {error}");
                self.emit(SessionEvent::ZoomRejected {
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        self.state = end;
        let last = self.store.last();

        self.emit(SessionEvent::ZoomFinished {
            magnification: self.state.magnification(),
            last,
        });
        self.notify_displayed();
        Ok(plan.frames as usize)
    }

    // -- View ---------------------------------------------------------------

    /// Recenter the view without zooming and render one new frame at the
    /// current magnification. The center must lie strictly inside the
    /// visible window. Returns the new frame's index.
    pub fn set_center(&mut self, center: Complex) -> crate::Result<usize> {
        if !self.window().contains(center) {
            return Err(RenderError::CenterOutOfBounds {
                re: center.re,
                im: center.im,
            });
        }
        self.state = self
            .state
            .transition(&self.settings, center, self.state.magnification())?;
        let index = self.store.append(self.state.render(overlay(&self.settings)));
        self.store.last();
        debug!(%center, index, "Recentered");
        self.notify_displayed();
        Ok(index)
    }

    /// Plane point under a presentation-surface position.
    pub fn pick_point(&self, screen_x: f64, screen_y: f64) -> Complex {
        self.state.viewport().screen_to_plane(screen_x, screen_y)
    }

    // -- Parameters ---------------------------------------------------------

    pub fn set_zoom_factor(&mut self, value: f64) -> crate::Result<()> {
        check_zoom_factor(value)?;
        self.settings.zoom_factor = value;
        Ok(())
    }

    pub fn set_frame_delay(&mut self, ms: u64) -> crate::Result<()> {
        check_frame_delay(ms)?;
        self.settings.frame_delay_ms = ms;
        Ok(())
    }

    pub fn set_frames_per_zoom(&mut self, n: u32) -> crate::Result<()> {
        check_frames_per_zoom(n)?;
        self.settings.frames_per_zoom = n;
        Ok(())
    }

    // -- Navigation ---------------------------------------------------------

    pub fn display_frame(&mut self, index: usize) -> crate::Result<()> {
        self.store.set_displayed(index)?;
        self.notify_displayed();
        Ok(())
    }

    pub fn next_frame(&mut self) -> usize {
        let displayed = self.store.next();
        self.notify_displayed();
        displayed
    }

    pub fn previous_frame(&mut self) -> usize {
        let displayed = self.store.previous();
        self.notify_displayed();
        displayed
    }

    pub fn last_frame(&mut self) -> usize {
        let displayed = self.store.last();
        self.notify_displayed();
        displayed
    }

    /// Show frames 1 through last in order, pausing between each.
    pub fn replay_all(&mut self, pacer: &mut impl Pacer) -> crate::Result<()> {
        self.play(self.store.replay_all(), pacer)
    }

    /// Show the last `frames_per_zoom + 1` frames, ending on the last one.
    pub fn replay_last(&mut self, pacer: &mut impl Pacer) -> crate::Result<()> {
        let range = self
            .store
            .replay_last(self.settings.frames_per_zoom as usize);
        self.play(range, pacer)
    }

    fn play(&mut self, range: RangeInclusive<usize>, pacer: &mut impl Pacer) -> crate::Result<()> {
        let delay = self.settings.frame_delay();
        debug!(start = range.start(), end = range.end(), "Playback");
        for index in range {
            self.store.set_displayed(index)?;
            self.notify_displayed();
            pacer.pause(delay);
        }
        self.emit(SessionEvent::PlaybackFinished);
        Ok(())
    }

    // -- Dispatch -----------------------------------------------------------

    /// Run one command against the session.
    pub fn execute(&mut self, command: Command, pacer: &mut impl Pacer) -> crate::Result<()> {
        match command {
            Command::Zoom(target) => self.request_zoom(target).map(|_| ()),
            Command::SetCenter(center) => self.set_center(center).map(|_| ()),
            Command::SetZoomFactor(v) => self.set_zoom_factor(v),
            Command::SetFrameDelay(ms) => self.set_frame_delay(ms),
            Command::SetFramesPerZoom(n) => self.set_frames_per_zoom(n),
            Command::DisplayFrame(index) => self.display_frame(index),
            Command::NextFrame => {
                self.next_frame();
                Ok(())
            }
            Command::PreviousFrame => {
                self.previous_frame();
                Ok(())
            }
            Command::LastFrame => {
                self.last_frame();
                Ok(())
            }
            Command::ReplayAll => self.replay_all(pacer),
            Command::ReplayLast => self.replay_last(pacer),
        }
    }

    // -- Queries ------------------------------------------------------------

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn window(&self) -> &PlaneWindow {
        self.state.window()
    }

    pub fn magnification(&self) -> f64 {
        self.state.magnification()
    }

    pub fn max_iterations(&self) -> u32 {
        self.state.max_iterations()
    }

    pub fn zoom_factor(&self) -> f64 {
        self.settings.zoom_factor
    }

    pub fn frame_delay(&self) -> Duration {
        self.settings.frame_delay()
    }

    pub fn frames_per_zoom(&self) -> u32 {
        self.settings.frames_per_zoom
    }

    pub fn frames(&self) -> &FrameStore {
        &self.store
    }

    pub fn frame(&self, index: usize) -> crate::Result<Arc<Frame>> {
        self.store.frame(index)
    }

    pub fn displayed_frame(&self) -> Option<Arc<Frame>> {
        self.store.displayed_frame()
    }

    pub fn zoom_state(&self) -> ZoomState {
        self.gate.state()
    }

    pub(crate) fn gate(&self) -> Arc<ZoomGate> {
        Arc::clone(&self.gate)
    }
}

fn overlay(settings: &SessionSettings) -> Overlay {
    Overlay {
        draw_axes: settings.draw_axes,
    }
}
