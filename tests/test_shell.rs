mod common;

use std::path::PathBuf;
use std::rc::Rc;

use common::*;

fn video() -> CaptureOrigin {
    CaptureOrigin::File(PathBuf::from("clips/street.mp4"))
}

#[test]
fn test_starts_idle_with_stop_disabled() {
    let shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), ScriptedOpener::frames(1));
    assert!(matches!(shell.state(), ShellState::Idle));
    assert!(!shell.stop_enabled());
    assert!(shell.streaming_origin().is_none());
}

#[test]
fn test_start_stream_enables_stop_and_stop_disables_it() {
    let opener = ScriptedOpener::frames(5);
    let log = Rc::clone(&opener.log);
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), opener);

    let outcome = shell.start_stream(CaptureOrigin::Camera(0));
    assert!(outcome.notice.is_none());
    assert!(shell.stop_enabled());
    assert_eq!(shell.streaming_origin(), Some(&CaptureOrigin::Camera(0)));

    shell.stop();
    assert!(!shell.stop_enabled());
    assert_eq!(log.borrow().released, vec![CaptureOrigin::Camera(0)]);
    assert_eq!(log.borrow().live(), 0);
}

#[test]
fn test_tick_renders_each_frame_then_goes_idle_at_end_of_stream() {
    let detector = FixedDetector::new(vec![person_detection()]);
    let calls = Rc::clone(&detector.calls);
    let opener = ScriptedOpener::frames(2);
    let log = Rc::clone(&opener.log);
    let mut shell = Shell::new(shared_pipeline(detector), opener);

    shell.start_stream(video());
    for _ in 0..2 {
        let outcome = shell.tick();
        assert!(outcome.preview.is_some());
        assert!(outcome.notice.is_none());
        assert!(shell.is_streaming());
    }

    let outcome = shell.tick();
    assert!(outcome.preview.is_none());
    assert!(outcome.notice.is_none(), "end of stream is not an error");
    assert!(matches!(shell.state(), ShellState::Idle));
    assert_eq!(*calls.borrow(), 2);
    assert_eq!(log.borrow().live(), 0);
}

#[test]
fn test_tick_while_idle_does_nothing() {
    let detector = FixedDetector::new(vec![person_detection()]);
    let calls = Rc::clone(&detector.calls);
    let mut shell = Shell::new(shared_pipeline(detector), ScriptedOpener::frames(1));

    let outcome = shell.tick();
    assert!(outcome.preview.is_none());
    assert!(outcome.notice.is_none());
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_second_start_releases_first_session() {
    let opener = ScriptedOpener::frames(10);
    let log = Rc::clone(&opener.log);
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), opener);

    shell.start_stream(video());
    shell.tick();
    shell.start_stream(CaptureOrigin::Camera(0));

    assert_eq!(log.borrow().released, vec![video()]);
    assert_eq!(log.borrow().live(), 1);
    assert_eq!(shell.streaming_origin(), Some(&CaptureOrigin::Camera(0)));
}

#[test]
fn test_stop_is_idempotent() {
    let opener = ScriptedOpener::frames(3);
    let log = Rc::clone(&opener.log);
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), opener);

    shell.stop();
    shell.start_stream(video());
    shell.stop();
    shell.stop();

    assert!(!shell.is_streaming());
    assert_eq!(log.borrow().released.len(), 1);
}

#[test]
fn test_missing_image_gives_one_notice_and_stays_idle() {
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), ScriptedOpener::frames(1));

    let outcome = shell.upload_image(&PathBuf::from("/no/such/picture.jpg"));
    assert!(outcome.preview.is_none());
    assert_eq!(outcome.notice, Some(Notice::error("Cannot read image.")));
    assert!(matches!(shell.state(), ShellState::Idle));
}

#[test]
fn test_corrupt_image_is_reported() -> anyhow::Result<()> {
    let file = tempfile::Builder::new().suffix(".jpg").tempfile()?;
    std::fs::write(file.path(), b"not really a jpeg")?;
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), ScriptedOpener::frames(1));

    let outcome = shell.upload_image(file.path());
    assert_eq!(outcome.notice, Some(Notice::error("Cannot read image.")));
    Ok(())
}

#[test]
fn test_failed_upload_leaves_stream_running() {
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), ScriptedOpener::frames(3));
    shell.start_stream(CaptureOrigin::Camera(0));

    let outcome = shell.upload_image(&PathBuf::from("/no/such/picture.jpg"));
    assert!(outcome.notice.is_some());
    assert!(shell.is_streaming());
}

#[test]
fn test_unavailable_sources_report_which_kind_failed() {
    let mut opener = ScriptedOpener::frames(1);
    opener.unavailable = vec![CaptureOrigin::Camera(0), video()];
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), opener);

    let outcome = shell.start_stream(CaptureOrigin::Camera(0));
    assert_eq!(outcome.notice, Some(Notice::error("Cannot access webcam.")));
    assert!(!shell.is_streaming());

    let outcome = shell.start_stream(video());
    assert_eq!(outcome.notice, Some(Notice::error("Cannot open video file.")));
    assert!(!shell.is_streaming());
}

#[test]
fn test_read_error_mid_stream_notifies_and_stops() {
    let opener = ScriptedOpener::new(vec![Step::Frame, Step::Fail, Step::Frame]);
    let log = Rc::clone(&opener.log);
    let mut shell = Shell::new(shared_pipeline(FixedDetector::new(Vec::new())), opener);

    shell.start_stream(video());
    assert!(shell.tick().notice.is_none());

    let outcome = shell.tick();
    assert_eq!(outcome.notice, Some(Notice::error("Cannot read frame.")));
    assert!(!shell.is_streaming());
    assert_eq!(log.borrow().live(), 0);
}

#[test]
fn test_detector_failure_stops_stream() {
    let opener = ScriptedOpener::frames(3);
    let log = Rc::clone(&opener.log);
    let mut shell = Shell::new(shared_pipeline(FailingDetector), opener);

    shell.start_stream(CaptureOrigin::Camera(1));
    let outcome = shell.tick();

    assert_eq!(outcome.notice, Some(Notice::error("Detection failed.")));
    assert!(!shell.is_streaming());
    assert_eq!(log.borrow().live(), 0);
}
