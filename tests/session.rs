//! State-machine walkthroughs: the calibrate-then-measure flow, the reset
//! transitions, and every edge the session must refuse.

use pixelruler::{MeasureSession, Point, SessionMode, Unit};

fn click(session: &mut MeasureSession, x: f64, y: f64) {
    session.handle_screen_click(Point::new(x, y), false);
}

/// Drive a fresh session through ready + calibration:
/// pins 200 px apart, 20 cm long, 50 cm away -> 10 px/cm.
fn calibrated_session() -> MeasureSession {
    let mut session = MeasureSession::new();
    session.handle_camera_ready();
    click(&mut session, 100.0, 100.0);
    click(&mut session, 300.0, 100.0);
    assert!(session.handle_calibration_submit(20.0, Unit::Cm, 50.0));
    session
}

/// Add a 100 px measurement on top of the calibration -> 10 cm.
fn measured_session() -> MeasureSession {
    let mut session = calibrated_session();
    click(&mut session, 150.0, 200.0);
    click(&mut session, 250.0, 200.0);
    assert_eq!(session.mode(), SessionMode::ShowResult);
    session
}

#[test]
fn happy_path_from_start_to_result() {
    let mut session = MeasureSession::new();
    assert_eq!(session.mode(), SessionMode::Start);
    assert!(session.is_camera_on());

    session.handle_camera_ready();
    assert_eq!(session.mode(), SessionMode::CalibrateStep1);

    click(&mut session, 100.0, 100.0);
    assert_eq!(session.mode(), SessionMode::CalibrateStep2);
    assert_eq!(session.calibration_points().len(), 1);

    click(&mut session, 300.0, 100.0);
    assert_eq!(session.mode(), SessionMode::CalibrateInput);
    assert_eq!(session.calibration_points().len(), 2);

    assert!(session.handle_calibration_submit(20.0, Unit::Cm, 50.0));
    assert_eq!(session.mode(), SessionMode::MeasureStep1);
    let baseline = session.baseline().expect("baseline set");
    assert_eq!(baseline.pixels_per_unit, 10.0);
    assert_eq!(baseline.reference_distance, 50.0);
    assert_eq!(session.unit(), Unit::Cm);
    assert_eq!(session.plane_shift(), 0.0);

    click(&mut session, 150.0, 200.0);
    assert_eq!(session.mode(), SessionMode::MeasureStep2);

    click(&mut session, 250.0, 200.0);
    assert_eq!(session.mode(), SessionMode::ShowResult);
    assert_eq!(session.measured_distance(), Some(10.0));
}

#[test]
fn overlay_clicks_are_never_pins() {
    let mut session = MeasureSession::new();
    session.handle_camera_ready();

    session.handle_screen_click(Point::new(10.0, 10.0), true);
    assert_eq!(session.mode(), SessionMode::CalibrateStep1);
    assert_eq!(session.calibration_points().len(), 0);

    let mut measuring = calibrated_session();
    measuring.handle_screen_click(Point::new(10.0, 10.0), true);
    assert_eq!(measuring.mode(), SessionMode::MeasureStep1);
    assert_eq!(measuring.measurement_points().len(), 0);
}

#[test]
fn clicks_outside_collecting_modes_are_ignored() {
    let mut session = MeasureSession::new();
    click(&mut session, 5.0, 5.0); // Start
    assert_eq!(session.mode(), SessionMode::Start);
    assert_eq!(session.calibration_points().len(), 0);

    let mut input = MeasureSession::new();
    input.handle_camera_ready();
    click(&mut input, 100.0, 100.0);
    click(&mut input, 300.0, 100.0);
    click(&mut input, 400.0, 400.0); // CalibrateInput
    assert_eq!(input.mode(), SessionMode::CalibrateInput);
    assert_eq!(input.calibration_points().len(), 2);

    let mut shown = measured_session();
    click(&mut shown, 400.0, 400.0); // ShowResult
    assert_eq!(shown.mode(), SessionMode::ShowResult);
    assert_eq!(shown.measurement_points().len(), 2);
    assert_eq!(shown.measured_distance(), Some(10.0));
}

#[test]
fn point_pairs_never_exceed_two() {
    // Stall in MeasureStep2 with an undefined scale, then spam clicks.
    let mut session = calibrated_session();
    session.set_plane_shift(-50.0); // effective distance 0, scale absent
    click(&mut session, 0.0, 0.0);
    click(&mut session, 100.0, 0.0);
    assert_eq!(session.mode(), SessionMode::MeasureStep2);
    for i in 0..5 {
        click(&mut session, 10.0 * f64::from(i), 99.0);
        assert!(session.measurement_points().len() <= 2);
        assert!(session.calibration_points().len() <= 2);
    }
    assert_eq!(session.measurement_points().len(), 2);
}

#[test]
fn ready_only_advances_from_start() {
    let mut session = calibrated_session();
    session.handle_camera_ready();
    assert_eq!(session.mode(), SessionMode::MeasureStep1);
}

#[test]
fn submit_is_refused_outside_calibrate_input() {
    let mut session = MeasureSession::new();
    assert!(!session.handle_calibration_submit(20.0, Unit::Cm, 50.0));
    assert_eq!(session.mode(), SessionMode::Start);
    assert!(session.baseline().is_none());

    let mut measuring = calibrated_session();
    let before = *measuring.baseline().unwrap();
    assert!(!measuring.handle_calibration_submit(99.0, Unit::M, 1.0));
    assert_eq!(*measuring.baseline().unwrap(), before);
}

#[test]
fn submit_refuses_nonpositive_values() {
    let mut session = MeasureSession::new();
    session.handle_camera_ready();
    click(&mut session, 100.0, 100.0);
    click(&mut session, 300.0, 100.0);

    assert!(!session.handle_calibration_submit(0.0, Unit::Cm, 50.0));
    assert!(!session.handle_calibration_submit(20.0, Unit::Cm, -1.0));
    assert_eq!(session.mode(), SessionMode::CalibrateInput);
    assert!(session.baseline().is_none());

    // Valid input still goes through afterwards.
    assert!(session.handle_calibration_submit(20.0, Unit::Cm, 50.0));
    assert_eq!(session.mode(), SessionMode::MeasureStep1);
}

#[test]
fn plane_shift_reprojects_a_showing_result() {
    let mut session = measured_session();
    assert_eq!(session.measured_distance(), Some(10.0));

    // Camera asserted twice as far away: the same span reads double.
    session.set_plane_shift(50.0);
    assert_eq!(session.mode(), SessionMode::ShowResult);
    assert_eq!(session.effective_scale(), Some(5.0));
    assert_eq!(session.measured_distance(), Some(20.0));

    session.set_plane_shift(0.0);
    assert_eq!(session.measured_distance(), Some(10.0));
}

#[test]
fn degenerate_shift_keeps_the_previous_distance() {
    let mut session = measured_session();
    session.set_plane_shift(-50.0); // effective distance 0
    assert_eq!(session.effective_scale(), None);
    assert_eq!(session.measured_distance(), Some(10.0));
    assert_eq!(session.mode(), SessionMode::ShowResult);

    session.set_plane_shift(-60.0); // negative effective distance
    assert_eq!(session.effective_scale(), None);
    assert_eq!(session.measured_distance(), Some(10.0));
}

#[test]
fn shift_change_completes_a_stalled_measurement() {
    // Second pin lands while the scale is undefined: the session stays in
    // MeasureStep2 until a usable scale appears.
    let mut session = calibrated_session();
    session.set_plane_shift(-50.0);
    click(&mut session, 150.0, 200.0);
    click(&mut session, 250.0, 200.0);
    assert_eq!(session.mode(), SessionMode::MeasureStep2);
    assert_eq!(session.measured_distance(), None);

    session.set_plane_shift(0.0);
    assert_eq!(session.mode(), SessionMode::ShowResult);
    assert_eq!(session.measured_distance(), Some(10.0));
}

#[test]
fn camera_off_clears_everything() {
    let mut session = measured_session();
    session.set_plane_shift(10.0);

    session.toggle_camera();
    assert!(!session.is_camera_on());
    assert_eq!(session.mode(), SessionMode::CameraOff);
    assert!(session.baseline().is_none());
    assert_eq!(session.calibration_points().len(), 0);
    assert_eq!(session.measurement_points().len(), 0);
    assert_eq!(session.measured_distance(), None);
    assert_eq!(session.plane_shift(), 0.0);
    assert_eq!(session.unit(), Unit::Cm);

    // Back on: the ready handshake is re-entered, not skipped.
    session.toggle_camera();
    assert!(session.is_camera_on());
    assert_eq!(session.mode(), SessionMode::Start);
    session.handle_camera_ready();
    assert_eq!(session.mode(), SessionMode::CalibrateStep1);
}

#[test]
fn recalibrate_discards_the_old_baseline_entirely() {
    let mut session = measured_session();
    session.recalibrate();
    assert_eq!(session.mode(), SessionMode::CalibrateStep1);
    assert!(session.baseline().is_none());
    assert_eq!(session.calibration_points().len(), 0);
    assert_eq!(session.measurement_points().len(), 0);
    assert_eq!(session.measured_distance(), None);
    assert_eq!(session.plane_shift(), 0.0);
    assert_eq!(session.unit(), Unit::Cm);

    // A new cycle derives a fresh scale with no trace of the old one.
    click(&mut session, 0.0, 0.0);
    click(&mut session, 300.0, 0.0);
    assert!(session.handle_calibration_submit(10.0, Unit::M, 2.0));
    assert_eq!(session.baseline().unwrap().pixels_per_unit, 30.0);
    assert_eq!(session.unit(), Unit::M);
}

#[test]
fn recalibrate_is_refused_outside_measuring_modes() {
    let mut session = MeasureSession::new();
    session.handle_camera_ready();
    click(&mut session, 100.0, 100.0);
    session.recalibrate();
    assert_eq!(session.mode(), SessionMode::CalibrateStep2);
    assert_eq!(session.calibration_points().len(), 1);
}

#[test]
fn remeasure_keeps_the_baseline() {
    let mut session = measured_session();
    session.set_plane_shift(25.0);
    session.remeasure();
    assert_eq!(session.mode(), SessionMode::MeasureStep1);
    assert_eq!(session.measurement_points().len(), 0);
    assert_eq!(session.measured_distance(), None);
    assert_eq!(session.plane_shift(), 0.0);
    assert!(session.baseline().is_some());

    // Only meaningful from ShowResult.
    session.remeasure();
    assert_eq!(session.mode(), SessionMode::MeasureStep1);
}

#[test]
fn camera_error_is_terminal_until_retoggled() {
    let mut session = MeasureSession::new();
    session.handle_camera_error("Permission denied");
    assert_eq!(session.mode(), SessionMode::CameraError);
    assert_eq!(session.camera_error(), Some("Permission denied"));

    // Neither clicks nor a late ready signal revive the session.
    click(&mut session, 10.0, 10.0);
    session.handle_camera_ready();
    assert_eq!(session.mode(), SessionMode::CameraError);

    // Off and on again re-attempts from Start.
    session.toggle_camera();
    assert_eq!(session.mode(), SessionMode::CameraOff);
    session.toggle_camera();
    assert_eq!(session.mode(), SessionMode::Start);
    session.handle_camera_ready();
    assert_eq!(session.mode(), SessionMode::CalibrateStep1);
}

#[test]
fn configured_default_unit_is_used_on_reset() {
    let mut session = MeasureSession::with_default_unit(Unit::In);
    session.handle_camera_ready();
    click(&mut session, 0.0, 0.0);
    click(&mut session, 100.0, 0.0);
    assert!(session.handle_calibration_submit(4.0, Unit::Ft, 10.0));
    assert_eq!(session.unit(), Unit::Ft);

    session.toggle_camera();
    assert_eq!(session.unit(), Unit::In);
}
