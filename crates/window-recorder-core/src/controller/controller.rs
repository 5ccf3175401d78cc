use crate::{
    CaptureError, CoreResult,
    capture::{CaptureBackend, XcapBackend},
    controller::{
        SessionHandle,
        session::{SessionRelease, SessionSlot},
        worker::SessionJob,
    },
    encoder::{AviSinkFactory, SinkFactory},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Instant,
};

use chrono::Local;
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Starts and stops window recording sessions.
///
/// # Concurrency
///
/// At most one session records at a time: `start` is rejected with
/// [`CaptureError::SessionActive`] until `stop` is called or the running
/// session ends on its own. Each session gets its own cancellation signal,
/// so a session that is still finalizing after `stop` never shares
/// cancellation state with the next one.
///
/// Neither `start` nor `stop` waits for the worker. Use the returned
/// [`SessionHandle`] to observe finalization.
pub struct CaptureController<B, F> {
    backend: Arc<B>,
    sinks: Arc<F>,
    output_dir: PathBuf,
    active: Arc<AtomicBool>,
    current: Arc<Mutex<Option<SessionSlot>>>,
}

impl CaptureController<XcapBackend, AviSinkFactory> {
    /// Controller recording the local desktop into AVI files in `output_dir`.
    pub fn desktop<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self::new(XcapBackend::new(), AviSinkFactory, output_dir)
    }
}

impl<B: CaptureBackend, F: SinkFactory> CaptureController<B, F> {
    /// Create a controller over the given capture backend and sink factory.
    pub fn new<P: Into<PathBuf>>(backend: B, sinks: F, output_dir: P) -> Self {
        Self {
            backend: Arc::new(backend),
            sinks: Arc::new(sinks),
            output_dir: output_dir.into(),
            active: Arc::new(AtomicBool::new(false)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Directory recordings are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether a session is currently recording.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Start recording the first window whose title contains `title`.
    ///
    /// Returns as soon as the worker is launched; window lookup happens on
    /// the worker and its failure is delivered through the handle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTitle` for a blank title, `SessionActive` if a session
    /// is recording, or `WorkerSpawnFailed` if the worker cannot be launched.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&self, title: &str) -> CoreResult<SessionHandle> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CaptureError::InvalidTitle {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut current = self.lock_current();

        if self.active.load(Ordering::Acquire) {
            return Err(CaptureError::SessionActive {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let id = Uuid::new_v4();
        let cancel = Arc::new(AtomicBool::new(false));
        let (handle, outcome_tx) = SessionHandle::new(id);

        let job = SessionJob {
            id,
            title: title.to_string(),
            started_at: Local::now(),
            requested_at: Instant::now(),
            output_dir: self.output_dir.clone(),
            backend: Arc::clone(&self.backend),
            sinks: Arc::clone(&self.sinks),
            cancel: Arc::clone(&cancel),
        };
        let release = SessionRelease {
            id,
            active: Arc::clone(&self.active),
            current: Arc::clone(&self.current),
        };

        self.active.store(true, Ordering::Release);

        let spawned = thread::Builder::new()
            .name(format!("capture-{}", id.simple()))
            .spawn(move || {
                let outcome = {
                    let _release = release;
                    job.run()
                };

                match &outcome {
                    Ok(report) => info!(
                        session_id = %id,
                        path = ?report.path,
                        frames = report.frames_written,
                        duration_ms = report.elapsed.as_millis(),
                        "Recording finalized"
                    ),
                    Err(CaptureError::WindowNotFound { title, .. }) => {
                        error!(session_id = %id, title = %title, "Window not found")
                    }
                    Err(e) => error!(session_id = %id, error = %e, "Recording session failed"),
                }

                if outcome_tx.send(outcome).is_err() {
                    debug!(session_id = %id, "Session handle dropped before completion");
                }
            });

        if let Err(e) = spawned {
            self.active.store(false, Ordering::Release);
            return Err(CaptureError::WorkerSpawnFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        *current = Some(SessionSlot { id, cancel });

        info!(session_id = %id, "Capture session launched");

        Ok(handle)
    }

    /// Request the running session to stop. Safe to call at any time.
    ///
    /// The worker observes the request at its next loop check, finalizes the
    /// output file and then reports through its handle.
    #[instrument(skip(self))]
    pub fn stop(&self) {
        let mut current = self.lock_current();

        match current.take() {
            Some(slot) => {
                slot.cancel.store(true, Ordering::Release);
                self.active.store(false, Ordering::Release);
                info!(session_id = %slot.id, "Stop requested");
            }
            None => debug!("Stop requested with no active session"),
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<SessionSlot>> {
        self.current.lock().unwrap_or_else(|e| {
            error!("Session slot lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}
