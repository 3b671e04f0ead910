use std::sync::mpsc::Receiver;

use tracing::{debug, info, warn};

use mandelzoom_core::Complex;
use mandelzoom_render::{Command, RenderError, SessionEvent, SessionHandle};

/// Outcome of a scripted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub zooms_completed: u32,
    /// The run stopped early at the precision ceiling.
    pub hit_ceiling: bool,
}

/// How one zoom request ended.
enum ZoomOutcome {
    Played,
    Refused(RenderError),
}

/// Issue `zooms` zoom requests toward `target`, waiting for each one's
/// playback to finish before sending the next.
pub fn run_zooms(
    handle: &SessionHandle,
    events: &Receiver<SessionEvent>,
    target: Complex,
    zooms: u32,
) -> Result<RunSummary, RenderError> {
    let mut summary = RunSummary::default();
    for n in 1..=zooms {
        info!(zoom = n, of = zooms, %target, "Requesting zoom");
        handle.send(Command::Zoom(target))?;
        match wait_for_zoom(events)? {
            ZoomOutcome::Played => summary.zooms_completed += 1,
            ZoomOutcome::Refused(RenderError::ZoomAtCeiling { magnification }) => {
                info!(magnification, "Precision ceiling reached, stopping");
                summary.hit_ceiling = true;
                break;
            }
            ZoomOutcome::Refused(error) => return Err(error),
        }
    }
    Ok(summary)
}

fn wait_for_zoom(events: &Receiver<SessionEvent>) -> Result<ZoomOutcome, RenderError> {
    loop {
        match events.recv().map_err(|_| RenderError::WorkerStopped)? {
            SessionEvent::ZoomStarted { from, to, .. } => {
                debug!(from, to, "Zoom started");
            }
            event @ SessionEvent::Progress { step, frames, .. } => {
                info!(
                    step,
                    frames,
                    percent = event.percent().unwrap_or_default(),
                    "Generating"
                );
            }
            SessionEvent::ZoomFinished {
                magnification,
                last,
            } => {
                info!(magnification, last_frame = last, "Zoom finished");
            }
            SessionEvent::DisplayedFrame { displayed, last } => {
                debug!(displayed, last, "Displaying frame");
            }
            SessionEvent::PlaybackFinished => return Ok(ZoomOutcome::Played),
            SessionEvent::ZoomRejected { error } => return Ok(ZoomOutcome::Refused(error)),
            SessionEvent::CommandFailed { command, error } => {
                warn!(?command, "Command failed: {error}");
                return Err(error);
            }
        }
    }
}

/// Play every frame once and wait for playback to end.
pub fn replay_all(
    handle: &SessionHandle,
    events: &Receiver<SessionEvent>,
) -> Result<(), RenderError> {
    handle.send(Command::ReplayAll)?;
    loop {
        match events.recv().map_err(|_| RenderError::WorkerStopped)? {
            SessionEvent::PlaybackFinished => return Ok(()),
            SessionEvent::CommandFailed { error, .. } => return Err(error),
            _ => {}
        }
    }
}
