//! The capture loop run on a session's background worker.

use crate::{
    CaptureError, CaptureRegion, CoreResult,
    capture::{CaptureBackend, TargetWindow},
    controller::SessionReport,
    encoder::{FRAME_RATE, FourCc, SinkFactory, SinkSpec, VideoSink, file_stem, reserve_output},
};

use std::{
    fs,
    panic::Location,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Time between two consecutive screenshots.
pub(crate) fn frame_interval() -> Duration {
    Duration::from_secs(1) / FRAME_RATE
}

/// Everything the worker needs, fixed when the session is created.
pub(crate) struct SessionJob<B, F> {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) started_at: DateTime<Local>,
    pub(crate) requested_at: Instant,
    pub(crate) output_dir: PathBuf,
    pub(crate) backend: Arc<B>,
    pub(crate) sinks: Arc<F>,
    pub(crate) cancel: Arc<AtomicBool>,
}

impl<B: CaptureBackend, F: SinkFactory> SessionJob<B, F> {
    /// Resolve the window, record it until cancelled, and finalize the output.
    #[instrument(skip(self), fields(session_id = %self.id, title = %self.title))]
    pub(crate) fn run(self) -> CoreResult<SessionReport> {
        let mut window = self.resolve_window()?;

        if window.is_minimized() {
            info!("Window is minimized, requesting restore");
            if let Err(e) = window.restore() {
                warn!(error = %e, "Restore request failed, capturing anyway");
            }
        }

        let region = window.region();
        if region.is_empty() {
            return Err(CaptureError::CaptureFailed {
                reason: format!("Window {:?} has no visible area ({})", window.title(), region),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (path, file) = reserve_output(&self.output_dir, &file_stem(&self.started_at))?;
        let spec = SinkSpec {
            path: path.clone(),
            codec: FourCc::MJPG,
            fps: FRAME_RATE,
            width: region.width,
            height: region.height,
        };

        let mut sink = match self.sinks.open(file, &spec) {
            Ok(sink) => sink,
            Err(e) => {
                if let Err(rm) = fs::remove_file(&path) {
                    warn!(path = ?path, error = %rm, "Failed to remove unused output file");
                }
                return Err(e);
            }
        };

        info!(path = ?path, region = %region, fps = FRAME_RATE, "Recording started");

        let captured = self.capture_frames(sink.as_mut(), region);
        let finished = sink.finish();

        match (captured, finished) {
            (Ok(frames), Ok(summary)) => {
                debug!(frames, "Capture loop exited");
                Ok(SessionReport {
                    session_id: self.id,
                    path,
                    region,
                    frames_written: summary.frames,
                    bytes: summary.bytes,
                    elapsed: self.requested_at.elapsed(),
                })
            }
            (Err(e), Ok(summary)) => {
                warn!(
                    path = ?path,
                    frames = summary.frames,
                    "Capture aborted, partial recording finalized"
                );
                Err(e)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Err(finish_err)) => {
                error!(path = ?path, error = %finish_err, "Failed to finalize partial recording");
                Err(e)
            }
        }
    }

    #[track_caller]
    fn resolve_window(&self) -> CoreResult<B::Window> {
        self.backend
            .find_windows(&self.title)?
            .into_iter()
            .next()
            .ok_or_else(|| CaptureError::WindowNotFound {
                title: self.title.clone(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Append one frame per interval until the cancellation signal is raised.
    ///
    /// The signal is checked at the top of every iteration, so at most the
    /// frame already in flight is written after `stop`.
    fn capture_frames(&self, sink: &mut dyn VideoSink, region: CaptureRegion) -> CoreResult<u64> {
        let interval = frame_interval();
        let mut next_frame = Instant::now();
        let mut frames = 0u64;

        loop {
            if self.cancel.load(Ordering::Acquire) {
                break;
            }

            let frame = self.backend.screenshot(region)?.into_rgb()?;
            sink.write_frame(&frame)?;
            frames += 1;

            next_frame += interval;
            let now = Instant::now();
            if next_frame > now {
                thread::sleep(next_frame - now);
            } else {
                // Fell behind; drop the backlog instead of bursting.
                next_frame = now;
            }
        }

        Ok(frames)
    }
}
