use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use mandelzoom_core::Complex;

use crate::animator::{ZoomGate, ZoomState, ZoomTicket};
use crate::error::RenderError;
use crate::playback::ThreadPacer;
use crate::session::{Command, SessionEvent, ZoomSession};
use crate::settings::{check_frame_delay, check_frames_per_zoom, check_zoom_factor};

/// Message sent from a [`SessionHandle`] to the worker thread.
pub(crate) enum Job {
    Command(Command),
    /// A zoom whose gate was already acquired by the caller.
    Zoom { target: Complex, ticket: ZoomTicket },
    Subscribe(mpsc::Sender<SessionEvent>),
    Notify(SessionEvent),
}

/// Caller side of a session running on its own thread.
///
/// Commands are queued and executed in order. A zoom request is checked
/// against the gate before it is queued, so a second zoom while one is
/// generating fails immediately with `ZoomInProgress`.
pub struct SessionHandle {
    tx: mpsc::Sender<Job>,
    gate: Arc<ZoomGate>,
    thread: Option<JoinHandle<ZoomSession>>,
}

/// Move `session` onto a dedicated worker thread.
///
/// The thread runs until the handle is shut down or dropped.
pub fn spawn_session(session: ZoomSession) -> crate::Result<SessionHandle> {
    let (tx, rx) = mpsc::channel::<Job>();
    let gate = session.gate();

    let thread = std::thread::Builder::new()
        .name("session-worker".into())
        .spawn(move || run(session, rx))
        .map_err(|e| RenderError::WorkerSpawn(e.to_string()))?;

    Ok(SessionHandle {
        tx,
        gate,
        thread: Some(thread),
    })
}

fn run(mut session: ZoomSession, rx: mpsc::Receiver<Job>) -> ZoomSession {
    debug!("Session worker started");
    let mut pacer = ThreadPacer;
    while let Ok(job) = rx.recv() {
        match job {
            Job::Zoom { target, ticket } => {
                let command = Command::Zoom(target);
                let generated = session.zoom_with_ticket(target, &ticket);
                drop(ticket);
                let result = generated.and_then(|_| session.replay_last(&mut pacer));
                if let Err(error) = result {
                    report(&mut session, command, error);
                }
            }
            Job::Command(command) => {
                if let Err(error) = session.execute(command, &mut pacer) {
                    report(&mut session, command, error);
                }
            }
            Job::Subscribe(tx) => session.add_subscriber(tx),
            Job::Notify(event) => session.emit(event),
        }
    }
    debug!("Session worker exiting");
    session
}

fn report(session: &mut ZoomSession, command: Command, error: RenderError) {
    if error.is_benign() {
        debug!(?command, "Command refused: {error}");
        // Refusals already produce a ZoomRejected event.
        return;
    }
    warn!(?command, "Command failed: {error}");
    session.emit(SessionEvent::CommandFailed { command, error });
}

impl SessionHandle {
    /// Queue `command` for the worker.
    ///
    /// Parameter values and zoom availability are checked here so the
    /// caller learns about obvious rejections without waiting.
    pub fn send(&self, command: Command) -> crate::Result<()> {
        match command {
            Command::Zoom(target) => {
                let ticket = match self.gate.try_acquire() {
                    Ok(ticket) => ticket,
                    Err(error) => {
                        warn!(%target, "Zoom request refused: zoom in progress");
                        self.post(Job::Notify(SessionEvent::ZoomRejected {
                            error: error.clone(),
                        }))?;
                        return Err(error);
                    }
                };
                return self.post(Job::Zoom { target, ticket });
            }
            Command::SetZoomFactor(v) => check_zoom_factor(v)?,
            Command::SetFrameDelay(ms) => check_frame_delay(ms)?,
            Command::SetFramesPerZoom(n) => check_frames_per_zoom(n)?,
            _ => {}
        }
        self.post(Job::Command(command))
    }

    /// Register for session events.
    pub fn subscribe(&self) -> crate::Result<mpsc::Receiver<SessionEvent>> {
        let (tx, rx) = mpsc::channel();
        self.post(Job::Subscribe(tx))?;
        Ok(rx)
    }

    pub fn zoom_state(&self) -> ZoomState {
        self.gate.state()
    }

    /// Stop accepting commands, wait for queued ones to finish, and return
    /// the session.
    pub fn shutdown(mut self) -> crate::Result<ZoomSession> {
        let thread = self.thread.take().ok_or(RenderError::WorkerStopped)?;
        let (tx, _) = mpsc::channel();
        drop(std::mem::replace(&mut self.tx, tx));
        thread.join().map_err(|_| RenderError::WorkerStopped)
    }

    fn post(&self, job: Job) -> crate::Result<()> {
        self.tx.send(job).map_err(|_| RenderError::WorkerStopped)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let (tx, _) = mpsc::channel();
            drop(std::mem::replace(&mut self.tx, tx));
            if thread.join().is_err() {
                warn!("Session worker panicked");
            }
        }
    }
}
