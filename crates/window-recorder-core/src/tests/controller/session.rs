use crate::{
    CaptureController, CaptureError, CaptureRegion, SessionHandle,
    tests::controller::fakes::{FakeBackend, FakeSinkFactory, FakeWindowSpec},
};

use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// WHAT: try_outcome reports nothing while recording, then the report
/// WHY: The UI polls every frame and must not block
#[test]
fn given_running_session_when_polling_then_outcome_only_after_stop() {
    // Given: A recording session
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = CaptureController::new(
        FakeBackend::with_window(
            &log,
            FakeWindowSpec {
                title: "Viewer",
                minimized: false,
                fail_restore: false,
                region: CaptureRegion::new(5, 5, 4, 4),
            },
        ),
        FakeSinkFactory::new(&log),
        dir.path(),
    );
    let mut session = controller.start("Viewer").unwrap();

    // When: Polling before and after stop
    let while_recording = session.try_outcome();
    controller.stop();
    let mut outcome = None;
    crate::tests::controller::fakes::wait_until("session outcome", || {
        outcome = session.try_outcome();
        outcome.is_some()
    });

    // Then: Nothing while recording, a report afterwards
    assert!(while_recording.is_none());
    let report = outcome.unwrap().unwrap();
    assert_eq!(report.session_id, session.id());
    assert_eq!(report.region, CaptureRegion::new(5, 5, 4, 4));
}

/// WHAT: blocking_wait returns the finalized report
/// WHY: Non-async callers need a completion notification too
#[test]
fn given_stopped_session_when_blocking_wait_then_report_returned() {
    // Given: A session that is stopped right away
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = CaptureController::new(
        FakeBackend::with_window(
            &log,
            FakeWindowSpec {
                title: "Viewer",
                minimized: false,
                fail_restore: false,
                region: CaptureRegion::new(0, 0, 2, 2),
            },
        ),
        FakeSinkFactory::new(&log),
        dir.path(),
    );
    let session = controller.start("Viewer").unwrap();
    controller.stop();

    // When: Blocking for the outcome
    let report = session.blocking_wait().unwrap();

    // Then: The file exists and the controller is idle
    assert!(report.path.exists());
    assert!(!controller.is_active());
}

/// WHAT: Awaiting a handle whose worker vanished yields CaptureFailed
/// WHY: A worker that dies without reporting must not hang or panic the caller
#[tokio::test]
async fn given_worker_gone_when_awaiting_then_capture_failed_error() {
    // Given: A handle whose sending side is dropped without an outcome
    let (handle, outcome_tx) = SessionHandle::new(Uuid::new_v4());
    drop(outcome_tx);

    // When: Awaiting the outcome
    let outcome = handle.wait().await;

    // Then: CaptureFailed explaining the worker exited
    match outcome {
        Err(CaptureError::CaptureFailed { reason, .. }) => assert!(reason.contains("exited")),
        other => panic!("expected CaptureFailed, got {:?}", other),
    }
}
