use std::path::PathBuf;

use eframe::egui::{Color32, RichText, Ui};

/// Line of feedback shown under the recorder buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Nothing has happened yet.
    Ready,
    /// A session is recording.
    Recording {
        /// Title the session was started with.
        title: String,
    },
    /// Stop was requested; waiting for the file to be finalized.
    Finalizing,
    /// The last session finalized its recording.
    Saved {
        /// Finalized output file.
        path: PathBuf,
        /// Frames in the file.
        frames: u64,
    },
    /// The last start request or session failed.
    Failed(String),
}

impl Status {
    /// Render the status line.
    pub fn show(&self, ui: &mut Ui) {
        match self {
            Status::Ready => {
                ui.label(RichText::new("Ready").color(Color32::GRAY));
            }
            Status::Recording { title } => {
                ui.label(RichText::new(format!("● Recording \"{}\"", title)).color(Color32::RED));
            }
            Status::Finalizing => {
                ui.label(RichText::new("Saving…").color(Color32::YELLOW));
            }
            Status::Saved { path, frames } => {
                ui.label(
                    RichText::new(format!("Saved {} ({} frames)", path.display(), frames))
                        .color(Color32::GREEN),
                );
            }
            Status::Failed(message) => {
                ui.label(RichText::new(format!("✗ {}", message)).color(Color32::RED));
            }
        }
    }
}
