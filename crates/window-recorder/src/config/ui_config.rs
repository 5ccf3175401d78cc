use serde::{Deserialize, Serialize};

/// State remembered by the recorder window between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Title typed into the window-title field for the last recording.
    #[serde(default)]
    pub last_window_title: String,
}
