use crate::{CaptureError, encoder::naming::MAX_DISAMBIGUATOR, file_stem, reserve_output};

use chrono::{Local, TimeZone};

/// WHAT: Stem is the session start time as HH-MM-SS
/// WHY: Recordings are named by when they started
#[test]
fn given_start_time_when_formatting_stem_then_hours_minutes_seconds() {
    // Given: 09:05:03 local time
    let started_at = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 3).unwrap();

    // When: Formatting the stem
    let stem = file_stem(&started_at);

    // Then: Zero-padded, dash separated
    assert_eq!(stem, "09-05-03");
}

/// WHAT: Two sessions in the same second get distinct files
/// WHY: Timestamp-only names would silently overwrite the first recording
#[test]
fn given_existing_recording_when_reserving_same_stem_then_disambiguated() {
    // Given: A directory that already holds 12-00-00.avi
    let dir = tempfile::tempdir().unwrap();
    let (first, _) = reserve_output(dir.path(), "12-00-00").unwrap();
    std::fs::write(&first, b"first recording").unwrap();

    // When: Reserving the same stem twice more
    let (second, _) = reserve_output(dir.path(), "12-00-00").unwrap();
    let (third, _) = reserve_output(dir.path(), "12-00-00").unwrap();

    // Then: Suffixes are appended and the first file is untouched
    assert_eq!(first.file_name().unwrap(), "12-00-00.avi");
    assert_eq!(second.file_name().unwrap(), "12-00-00-1.avi");
    assert_eq!(third.file_name().unwrap(), "12-00-00-2.avi");
    assert_eq!(std::fs::read(&first).unwrap(), b"first recording");
}

/// WHAT: Running out of suffixes is an error, not an overwrite
/// WHY: The collision policy must never fall back to truncating a file
#[test]
fn given_all_names_taken_when_reserving_then_encoder_open_failed_error() {
    // Given: Every candidate name already exists
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("08-00-00.avi"), b"x").unwrap();
    for n in 1..=MAX_DISAMBIGUATOR {
        std::fs::write(dir.path().join(format!("08-00-00-{}.avi", n)), b"x").unwrap();
    }

    // When: Reserving the stem
    let result = reserve_output(dir.path(), "08-00-00");

    // Then: Returns EncoderOpenFailed
    assert!(matches!(result, Err(CaptureError::EncoderOpenFailed { .. })));
}

/// WHAT: Unwritable output directory fails the reservation
/// WHY: EncoderOpenFailure must surface instead of losing the recording silently
#[test]
fn given_missing_directory_when_reserving_then_encoder_open_failed_error() {
    // Given: A directory path that does not exist
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    // When: Reserving an output file inside it
    let result = reserve_output(&missing, "10-10-10");

    // Then: Returns EncoderOpenFailed
    assert!(matches!(result, Err(CaptureError::EncoderOpenFailed { .. })));
}
