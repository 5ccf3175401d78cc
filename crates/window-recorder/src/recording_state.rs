use std::time::Instant;

use uuid::Uuid;

/// Recording state for the recorder window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not currently recording.
    Idle,
    /// Currently recording a window.
    Recording {
        /// When recording started.
        started_at: Instant,
        /// Session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingState {
    /// Whether a session is recording.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }
}
