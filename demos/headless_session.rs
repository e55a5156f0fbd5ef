//! Drive the session state machine without any window: a scripted
//! calibrate-then-measure run printed to stdout.
//!
//! Run with: `cargo run --example headless_session`

use pixelruler::panels::result_ui::format_distance;
use pixelruler::{MeasureSession, Point, Unit};

fn main() {
    tracing_subscriber::fmt::init();

    let mut session = MeasureSession::new();
    session.handle_camera_ready();

    // Calibrate on a 20 cm object spanning 200 px, seen from 50 cm.
    session.handle_screen_click(Point::new(100.0, 100.0), false);
    session.handle_screen_click(Point::new(300.0, 100.0), false);
    assert!(session.handle_calibration_submit(20.0, Unit::Cm, 50.0));
    let baseline = session.baseline().expect("calibrated");
    println!(
        "calibrated: {:.2} px/{} at {} {}",
        baseline.pixels_per_unit,
        baseline.unit,
        baseline.reference_distance,
        baseline.unit
    );

    // Measure a 100 px span.
    session.handle_screen_click(Point::new(150.0, 200.0), false);
    session.handle_screen_click(Point::new(250.0, 200.0), false);
    let distance = session.measured_distance().expect("measured");
    println!("measured:   {}", format_distance(distance, session.unit()));

    // Assert the camera moved 50 cm further back and re-read the result.
    session.set_plane_shift(50.0);
    let shifted = session.measured_distance().expect("still measured");
    println!(
        "re-projected at +{} {}: {}",
        session.plane_shift(),
        session.unit(),
        format_distance(shifted, session.unit())
    );
}
