use crate::{CaptureError, CoreResult};

use std::{
    fs::{File, OpenOptions},
    io::ErrorKind,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tracing::debug;

/// Container extension of every recording.
pub const OUTPUT_EXTENSION: &str = "avi";

/// Upper bound on `-N` suffixes tried before giving up.
pub(crate) const MAX_DISAMBIGUATOR: u32 = 999;

/// File stem for a session started at `started_at`: `HH-MM-SS`.
pub fn file_stem(started_at: &DateTime<Local>) -> String {
    started_at.format("%H-%M-%S").to_string()
}

/// Create a new, empty output file in `dir` named after `stem`.
///
/// Tries `<stem>.avi` first, then `<stem>-1.avi`, `<stem>-2.avi`, ... so a
/// session never overwrites an earlier recording that started in the same
/// second. The file is created atomically with create-new semantics.
///
/// # Errors
///
/// Returns `EncoderOpenFailed` if the file cannot be created or every
/// candidate name is taken.
#[track_caller]
pub fn reserve_output(dir: &Path, stem: &str) -> CoreResult<(PathBuf, File)> {
    for n in 0..=MAX_DISAMBIGUATOR {
        let name = if n == 0 {
            format!("{}.{}", stem, OUTPUT_EXTENSION)
        } else {
            format!("{}-{}.{}", stem, n, OUTPUT_EXTENSION)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                debug!(path = ?path, disambiguator = n, "Output file reserved");
                return Ok((path, file));
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(CaptureError::EncoderOpenFailed {
                    path,
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
    }

    Err(CaptureError::EncoderOpenFailed {
        path: dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION)),
        reason: format!("No free file name after {} attempts", MAX_DISAMBIGUATOR + 1),
        location: ErrorLocation::from(Location::caller()),
    })
}
