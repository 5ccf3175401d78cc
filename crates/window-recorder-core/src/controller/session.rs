use crate::{CaptureError, CaptureRegion, CoreResult};

use std::{
    panic::Location,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error};
use uuid::Uuid;

/// Summary of a session whose recording was finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Session ID used in log records.
    pub session_id: Uuid,
    /// Finalized output file.
    pub path: PathBuf,
    /// Screen area that was recorded.
    pub region: CaptureRegion,
    /// Frames appended to the output file.
    pub frames_written: u64,
    /// Size of the finalized file in bytes.
    pub bytes: u64,
    /// Time from the start request until the file was finalized.
    pub elapsed: Duration,
}

/// Outcome delivered when a session's worker exits.
pub type SessionOutcome = CoreResult<SessionReport>;

/// Completion notification for a session started by a controller.
///
/// Dropping the handle does not stop the session; use the controller's
/// `stop` for that.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    outcome: oneshot::Receiver<SessionOutcome>,
}

impl SessionHandle {
    pub(crate) fn new(id: Uuid) -> (Self, oneshot::Sender<SessionOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { id, outcome: rx }, tx)
    }

    /// Session ID, matching the `session_id` field in log records.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Non-blocking poll for the session outcome.
    ///
    /// Returns `None` while the worker is still running. The outcome is
    /// delivered once; poll again after `Some` and the handle reports the
    /// worker as gone.
    #[track_caller]
    pub fn try_outcome(&mut self) -> Option<SessionOutcome> {
        match self.outcome.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(worker_gone())),
        }
    }

    /// Wait for the worker to finalize the recording.
    pub async fn wait(self) -> SessionOutcome {
        self.outcome.await.unwrap_or_else(|_| Err(worker_gone()))
    }

    /// Blocking variant of [`SessionHandle::wait`]. Must not be called from async code.
    #[track_caller]
    pub fn blocking_wait(self) -> SessionOutcome {
        let caller = Location::caller();
        self.outcome
            .blocking_recv()
            .unwrap_or_else(|_| Err(worker_gone_at(caller)))
    }
}

#[track_caller]
fn worker_gone() -> CaptureError {
    worker_gone_at(Location::caller())
}

fn worker_gone_at(caller: &'static Location<'static>) -> CaptureError {
    CaptureError::CaptureFailed {
        reason: "Capture worker exited without reporting an outcome".to_string(),
        location: ErrorLocation::from(caller),
    }
}

/// The session currently owning a controller's active flag.
#[derive(Debug)]
pub(crate) struct SessionSlot {
    pub(crate) id: Uuid,
    pub(crate) cancel: Arc<AtomicBool>,
}

/// Hands the controller back to idle when a session's worker exits, including
/// by panic, unless `stop` has already done so or a newer session owns it.
pub(crate) struct SessionRelease {
    pub(crate) id: Uuid,
    pub(crate) active: Arc<AtomicBool>,
    pub(crate) current: Arc<Mutex<Option<SessionSlot>>>,
}

impl Drop for SessionRelease {
    fn drop(&mut self) {
        let mut current = self.current.lock().unwrap_or_else(|e| {
            error!("Session slot lock poisoned, recovering: {}", e);
            e.into_inner()
        });

        if current.as_ref().is_some_and(|slot| slot.id == self.id) {
            *current = None;
            self.active.store(false, Ordering::Release);
            debug!(session_id = %self.id, "Controller returned to idle");
        }
    }
}
