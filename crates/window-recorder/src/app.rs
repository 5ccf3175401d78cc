//! The recorder window: a window-title field with Start and Stop buttons.
//!
//! Start is enabled only while idle and Stop only while recording. Sessions
//! that end on their own (window not found, capture failure) are picked up
//! by polling the session handle every frame.

use crate::{AppError, AppResult, RecordingState, Status, config::Config};

use std::{path::PathBuf, time::Duration, time::Instant};

use eframe::egui;
use tracing::{error, info, instrument, warn};
use window_recorder_core::{CaptureBackend, CaptureController, SessionHandle, SinkFactory};

/// How often the window repaints while a session runs, to pick up its outcome.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Main application state.
pub struct RecorderApp<B, F> {
    pub(crate) controller: CaptureController<B, F>,
    pub(crate) config: Config,
    /// Where `config` is persisted; `None` keeps it in memory only.
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) title: String,
    pub(crate) state: RecordingState,
    pub(crate) session: Option<SessionHandle>,
    pub(crate) status: Status,
}

impl<B: CaptureBackend, F: SinkFactory> RecorderApp<B, F> {
    /// Create the recorder window state, pre-filling the last used title.
    pub fn new(
        controller: CaptureController<B, F>,
        config: Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        let title = config.ui.last_window_title.clone();
        Self {
            controller,
            config,
            config_path,
            title,
            state: RecordingState::Idle,
            session: None,
            status: Status::Ready,
        }
    }

    /// Start is available only when no session is recording or finalizing.
    pub(crate) fn can_start(&self) -> bool {
        !self.state.is_recording() && self.session.is_none()
    }

    pub(crate) fn can_stop(&self) -> bool {
        self.state.is_recording()
    }

    /// Handle the Start button.
    pub(crate) fn on_start_clicked(&mut self) {
        if let Err(e) = self.start_recording() {
            error!(error = ?e, "Failed to start recording");
            self.status = Status::Failed(e.user_message());
        }
    }

    /// Start a recording session for the title in the text field.
    #[instrument(skip(self), fields(title = %self.title))]
    pub(crate) fn start_recording(&mut self) -> AppResult<()> {
        let handle = self.controller.start(&self.title)?;
        let session_id = handle.id();

        self.session = Some(handle);
        self.state = RecordingState::Recording {
            started_at: Instant::now(),
            session_id,
        };
        self.status = Status::Recording {
            title: self.title.trim().to_string(),
        };

        info!(session_id = %session_id, "Recording started");

        self.remember_title();

        Ok(())
    }

    /// Handle the Stop button.
    #[instrument(skip(self))]
    pub(crate) fn stop_recording(&mut self) {
        self.controller.stop();

        if let RecordingState::Recording {
            started_at,
            session_id,
        } = self.state
        {
            info!(
                session_id = %session_id,
                duration_ms = started_at.elapsed().as_millis(),
                "Recording stopped"
            );
        }

        self.state = RecordingState::Idle;
        if self.session.is_some() {
            self.status = Status::Finalizing;
        }
    }

    /// Pick up the outcome of a session that has finished.
    pub(crate) fn poll_session(&mut self) {
        let Some(outcome) = self.session.as_mut().and_then(SessionHandle::try_outcome) else {
            return;
        };

        self.session = None;
        self.state = RecordingState::Idle;
        self.status = match outcome {
            Ok(report) => Status::Saved {
                path: report.path,
                frames: report.frames_written,
            },
            Err(e) => Status::Failed(AppError::from(e).user_message()),
        };
    }

    /// Stop any running session and wait for its file to be finalized.
    #[instrument(skip(self))]
    pub(crate) fn shutdown(&mut self) {
        self.controller.stop();

        if let Some(handle) = self.session.take() {
            match handle.blocking_wait() {
                Ok(report) => info!(path = ?report.path, "Recording finalized on exit"),
                Err(e) => warn!(error = %e, "Recording ended with an error on exit"),
            }
        }

        self.state = RecordingState::Idle;
    }

    fn remember_title(&mut self) {
        let title = self.title.trim();
        if self.config.ui.last_window_title == title {
            return;
        }
        self.config.ui.last_window_title = title.to_string();

        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = ?e, "Failed to remember window title");
            }
        }
    }
}

impl<B: CaptureBackend, F: SinkFactory> eframe::App for RecorderApp<B, F> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_session();
        if self.session.is_some() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered_justified(|ui| {
                ui.add_space(10.0);
                ui.label("Enter window title");
                ui.add_space(5.0);

                let response = ui.add_enabled(
                    self.can_start(),
                    egui::TextEdit::singleline(&mut self.title).hint_text("Notepad"),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(5.0);

                let start = ui.add_enabled(self.can_start(), egui::Button::new("Start Recording"));
                if start.clicked() || (submitted && self.can_start()) {
                    self.on_start_clicked();
                }

                let stop = ui.add_enabled(self.can_stop(), egui::Button::new("Stop Recording"));
                if stop.clicked() {
                    self.stop_recording();
                }

                ui.separator();
                self.status.show(ui);
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
