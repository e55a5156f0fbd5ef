//! The interaction state machine driving a calibrate-then-measure session.
//!
//! [`MeasureSession`] owns every piece of session state (the current
//! [`SessionMode`], the two pin pairs, the calibration [`Baseline`], the
//! plane shift and the reported distance) and is the sole authority for
//! how an incoming click is interpreted. All derived quantities (effective
//! scale, measured distance) are recomputed from current state on every
//! relevant change rather than cached independently.
//!
//! Events are delivered one at a time by the host (clicks, form submits,
//! slider changes, camera signals); each handler is atomic with respect to
//! the state it touches.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::point::{Point, PointPair};
use super::scale::{compute_baseline, compute_distance, effective_scale, Baseline};
use super::units::Unit;

/// The mode of the session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Camera requested, waiting for the capture-ready handshake.
    Start,
    /// Capture acquisition failed; terminal until the camera is toggled
    /// off and on again.
    CameraError,
    /// Camera switched off by the user; all session state has been cleared.
    CameraOff,
    /// Waiting for the first calibration pin.
    CalibrateStep1,
    /// Waiting for the second calibration pin.
    CalibrateStep2,
    /// Both calibration pins placed; waiting for length/unit/distance.
    CalibrateInput,
    /// Calibrated; waiting for the first measurement pin.
    MeasureStep1,
    /// Waiting for the second measurement pin.
    MeasureStep2,
    /// A measured distance is on display.
    ShowResult,
}

impl SessionMode {
    /// True in the measuring and result modes, where the plane-shift
    /// control is meaningful.
    pub fn is_measuring(self) -> bool {
        matches!(
            self,
            SessionMode::MeasureStep1 | SessionMode::MeasureStep2 | SessionMode::ShowResult
        )
    }
}

/// One calibrate-then-measure session.
#[derive(Debug, Clone)]
pub struct MeasureSession {
    mode: SessionMode,
    camera_on: bool,
    camera_error: Option<String>,

    calibration: PointPair,
    measurement: PointPair,

    baseline: Option<Baseline>,
    plane_shift: f64,
    unit: Unit,
    measured_distance: Option<f64>,

    default_unit: Unit,
}

impl Default for MeasureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasureSession {
    /// A fresh session: camera on, waiting for the ready handshake.
    pub fn new() -> Self {
        Self::with_default_unit(Unit::default())
    }

    /// Like [`new`](Self::new), with a different unit to reset to after
    /// camera-off and recalibration.
    pub fn with_default_unit(default_unit: Unit) -> Self {
        Self {
            mode: SessionMode::Start,
            camera_on: true,
            camera_error: None,
            calibration: PointPair::default(),
            measurement: PointPair::default(),
            baseline: None,
            plane_shift: 0.0,
            unit: default_unit,
            measured_distance: None,
            default_unit,
        }
    }

    // ── Accessors (read by the presentation layer) ───────────────────────

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_camera_on(&self) -> bool {
        self.camera_on
    }

    /// The most recent acquisition error message, shown in CameraError mode.
    pub fn camera_error(&self) -> Option<&str> {
        self.camera_error.as_deref()
    }

    pub fn calibration_points(&self) -> &PointPair {
        &self.calibration
    }

    pub fn measurement_points(&self) -> &PointPair {
        &self.measurement
    }

    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn plane_shift(&self) -> f64 {
        self.plane_shift
    }

    pub fn measured_distance(&self) -> Option<f64> {
        self.measured_distance
    }

    /// The calibration-time distance, used to bound the plane-shift control.
    pub fn reference_distance(&self) -> Option<f64> {
        self.baseline.as_ref().map(|b| b.reference_distance)
    }

    /// The pixels-per-unit value currently in effect, derived on demand
    /// from the baseline and the plane shift.
    pub fn effective_scale(&self) -> Option<f64> {
        effective_scale(self.baseline.as_ref(), self.plane_shift)
    }

    // ── Capture signals ──────────────────────────────────────────────────

    /// The capture stream is acquired and attached. Advances Start into
    /// the first calibration step; ignored in every other mode (and while
    /// the camera is off, where a late resolution must not revive the
    /// session).
    pub fn handle_camera_ready(&mut self) {
        if self.camera_on && self.mode == SessionMode::Start {
            self.set_mode(SessionMode::CalibrateStep1);
        }
    }

    /// Capture acquisition failed. Records the message and enters
    /// CameraError; there is no automatic retry.
    pub fn handle_camera_error(&mut self, message: impl Into<String>) {
        if !self.camera_on {
            return;
        }
        let message = message.into();
        warn!(error = %message, "camera acquisition failed");
        self.camera_error = Some(message);
        self.set_mode(SessionMode::CameraError);
    }

    // ── Clicks ───────────────────────────────────────────────────────────

    /// Interpret a screen click according to the current mode.
    ///
    /// Clicks that target an interactive overlay surface (a card, a form)
    /// are not pins and are ignored in every mode. Background clicks place
    /// pins only in the four collecting modes; everywhere else they are
    /// no-ops.
    pub fn handle_screen_click(&mut self, point: Point, on_overlay: bool) {
        if on_overlay {
            return;
        }
        match self.mode {
            SessionMode::CalibrateStep1 => {
                self.calibration.set_first(point);
                self.set_mode(SessionMode::CalibrateStep2);
            }
            SessionMode::CalibrateStep2 => {
                self.calibration.push(point);
                self.set_mode(SessionMode::CalibrateInput);
            }
            SessionMode::MeasureStep1 => {
                self.measurement.set_first(point);
                self.set_mode(SessionMode::MeasureStep2);
            }
            SessionMode::MeasureStep2 => {
                self.measurement.push(point);
                self.refresh_result();
            }
            _ => {}
        }
    }

    // ── Calibration ──────────────────────────────────────────────────────

    /// Submit the calibration form. The form validates before calling;
    /// the session still refuses out-of-mode or non-positive input and
    /// returns whether the submission was accepted.
    ///
    /// On success the baseline is stored, the measurement pair and plane
    /// shift are reset, and the session enters the first measuring step.
    pub fn handle_calibration_submit(
        &mut self,
        known_length: f64,
        unit: Unit,
        declared_distance: f64,
    ) -> bool {
        if self.mode != SessionMode::CalibrateInput {
            return false;
        }
        match compute_baseline(&self.calibration, known_length, declared_distance, unit) {
            Some(baseline) => {
                debug!(
                    pixels_per_unit = baseline.pixels_per_unit,
                    reference_distance = baseline.reference_distance,
                    unit = %unit,
                    "calibration baseline established"
                );
                self.baseline = Some(baseline);
                self.unit = unit;
                self.measurement.clear();
                self.measured_distance = None;
                self.plane_shift = 0.0;
                self.set_mode(SessionMode::MeasureStep1);
                true
            }
            None => {
                warn!(known_length, declared_distance, "calibration submission refused");
                false
            }
        }
    }

    // ── Plane shift ──────────────────────────────────────────────────────

    /// Assert a new camera-to-plane distance shift. Never changes mode;
    /// recomputes the reported distance immediately when a complete
    /// measurement pair exists and the shifted scale is defined.
    pub fn set_plane_shift(&mut self, value: f64) {
        self.plane_shift = value;
        self.refresh_result();
    }

    // ── Camera toggle ────────────────────────────────────────────────────

    /// Flip the camera flag.
    ///
    /// Turning the camera off forcibly clears the baseline, both pin
    /// pairs, the plane shift, the unit and the reported distance; a stale
    /// scale must never survive into a new capture. Turning it back on
    /// re-enters the ready handshake from Start.
    pub fn toggle_camera(&mut self) {
        self.camera_on = !self.camera_on;
        if self.camera_on {
            if self.mode == SessionMode::CameraOff {
                self.set_mode(SessionMode::Start);
            }
        } else {
            self.reset_all();
            self.set_mode(SessionMode::CameraOff);
        }
    }

    // ── Remeasure / recalibrate ──────────────────────────────────────────

    /// Discard the current result and collect a fresh measurement pair
    /// against the same baseline. Only meaningful from ShowResult.
    pub fn remeasure(&mut self) {
        if self.mode != SessionMode::ShowResult {
            return;
        }
        self.measurement.clear();
        self.measured_distance = None;
        self.plane_shift = 0.0;
        self.set_mode(SessionMode::MeasureStep1);
    }

    /// Discard the baseline and every dependent value and restart from the
    /// first calibration pin. Accepted from the measuring and result modes.
    pub fn recalibrate(&mut self) {
        if !self.mode.is_measuring() {
            return;
        }
        self.reset_all();
        self.set_mode(SessionMode::CalibrateStep1);
    }

    // ── Internal ─────────────────────────────────────────────────────────

    /// Recompute the reported distance from current state.
    ///
    /// Completes the MeasureStep2 → ShowResult hop when the pair is full
    /// and a scale exists; refreshes the displayed value in ShowResult.
    /// With an undefined scale the previous distance is left untouched.
    fn refresh_result(&mut self) {
        if !self.measurement.is_complete() {
            return;
        }
        let Some(scale) = self.effective_scale() else {
            return;
        };
        match self.mode {
            SessionMode::MeasureStep2 => {
                self.measured_distance = compute_distance(&self.measurement, scale);
                if self.measured_distance.is_some() {
                    self.set_mode(SessionMode::ShowResult);
                }
            }
            SessionMode::ShowResult => {
                self.measured_distance = compute_distance(&self.measurement, scale);
            }
            _ => {}
        }
    }

    fn reset_all(&mut self) {
        self.calibration.clear();
        self.measurement.clear();
        self.baseline = None;
        self.measured_distance = None;
        self.plane_shift = 0.0;
        self.unit = self.default_unit;
    }

    fn set_mode(&mut self, mode: SessionMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "session mode change");
            self.mode = mode;
        }
    }
}
