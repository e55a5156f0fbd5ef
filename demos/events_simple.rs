//! Subscribe to ruler events and print them as JSON lines while the
//! window runs.
//!
//! Run with: `cargo run --example events_simple`

use pixelruler::{
    channel, CameraFrame, EventController, EventFilter, EventKind, NullStream, RulerConfig,
};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let events = EventController::new();
    let interesting = events.subscribe(EventFilter::only(
        EventKind::CALIBRATION_COMPLETE
            | EventKind::MEASUREMENT_COMPLETE
            | EventKind::RESULT_UPDATED
            | EventKind::MODE_CHANGED
            | EventKind::CAMERA_TOGGLED,
    ));
    std::thread::spawn(move || {
        for event in interesting {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => eprintln!("event serialization failed: {err}"),
            }
        }
    });

    // A single gray frame is enough to pin against.
    let (sink, rx) = channel();
    std::thread::spawn(move || {
        let _ = sink.send_ready(Box::new(NullStream), 640, 480);
        let _ = sink.send_frame(
            CameraFrame::new(640, 480, vec![90; 640 * 480 * 4]).expect("sized buffer"),
        );
    });

    let mut cfg = RulerConfig::default();
    cfg.controllers.event = Some(events);
    pixelruler::run_ruler(rx, cfg)
}
