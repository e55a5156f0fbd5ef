//! Capture-boundary tests: channel ordering, frame validation, and the
//! guarantee that the device guard is released on every path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pixelruler::{
    channel, CameraFrame, CaptureCommand, CaptureError, CaptureStream, RulerPanel, SessionMode,
};

/// A stream whose release is observable from the test.
struct TestStream(Arc<AtomicBool>);

impl CaptureStream for TestStream {
    fn stop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn test_stream() -> (Box<dyn CaptureStream>, Arc<AtomicBool>) {
    let stopped = Arc::new(AtomicBool::new(false));
    (Box::new(TestStream(stopped.clone())), stopped)
}

/// Run one headless UI frame against the panel.
fn run_frame(panel: &mut RulerPanel) {
    let ctx = egui::Context::default();
    let _ = ctx.run(Default::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| panel.update(ui));
    });
}

#[test]
fn commands_arrive_in_order() {
    let (sink, rx) = channel();
    let (stream, _stopped) = test_stream();
    sink.send_ready(stream, 640, 480).unwrap();
    sink.send_frame(CameraFrame::new(1, 1, vec![0, 0, 0, 255]).unwrap())
        .unwrap();
    sink.send_error("device lost").unwrap();

    match rx.recv().unwrap() {
        CaptureCommand::Ready { width, height, .. } => {
            assert_eq!((width, height), (640, 480));
        }
        _ => panic!("expected Ready first"),
    }
    assert!(matches!(rx.recv().unwrap(), CaptureCommand::Frame(_)));
    match rx.recv().unwrap() {
        CaptureCommand::Error { message } => assert_eq!(message, "device lost"),
        _ => panic!("expected Error last"),
    }
}

#[test]
fn frame_buffer_must_match_dimensions() {
    assert!(CameraFrame::new(2, 2, vec![0; 16]).is_ok());
    match CameraFrame::new(2, 2, vec![0; 15]) {
        Err(CaptureError::FrameSize {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 16);
            assert_eq!(actual, 15);
        }
        other => panic!("expected FrameSize error, got {other:?}"),
    }
}

#[test]
fn encoded_frames_are_decoded() {
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::new_rgba8(3, 2)
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();

    let frame = CameraFrame::decode(png.get_ref()).unwrap();
    assert_eq!((frame.width, frame.height), (3, 2));
    assert_eq!(frame.rgba.len(), 3 * 2 * 4);

    assert!(matches!(
        CameraFrame::decode(b"not an image"),
        Err(CaptureError::Decode(_))
    ));
}

#[test]
fn ready_to_a_gone_widget_still_releases_the_stream() {
    let (sink, rx) = channel();
    drop(rx);
    let (stream, stopped) = test_stream();
    let err = sink.send_ready(stream, 640, 480).unwrap_err();
    assert!(matches!(err, CaptureError::Disconnected));
    assert!(stopped.load(Ordering::SeqCst));
}

#[test]
fn toggling_off_releases_a_live_stream() {
    let (sink, rx) = channel();
    let mut panel = RulerPanel::new(rx);
    let (stream, stopped) = test_stream();
    sink.send_ready(stream, 640, 480).unwrap();

    run_frame(&mut panel);
    assert_eq!(panel.session.mode(), SessionMode::CalibrateStep1);
    assert!(!stopped.load(Ordering::SeqCst));

    panel.toggle_camera();
    assert_eq!(panel.session.mode(), SessionMode::CameraOff);
    assert!(stopped.load(Ordering::SeqCst));
}

#[test]
fn ready_resolving_after_camera_off_is_cancelled() {
    let (sink, rx) = channel();
    let mut panel = RulerPanel::new(rx);

    // Camera toggled off while the acquisition is still in flight.
    panel.toggle_camera();
    let (stream, stopped) = test_stream();
    sink.send_ready(stream, 640, 480).unwrap();

    run_frame(&mut panel);
    assert!(stopped.load(Ordering::SeqCst));
    assert_eq!(panel.session.mode(), SessionMode::CameraOff);
}

#[test]
fn errors_while_off_do_not_revive_the_session() {
    let (sink, rx) = channel();
    let mut panel = RulerPanel::new(rx);
    panel.toggle_camera();
    sink.send_error("late failure").unwrap();

    run_frame(&mut panel);
    assert_eq!(panel.session.mode(), SessionMode::CameraOff);
    assert_eq!(panel.session.camera_error(), None);
}
