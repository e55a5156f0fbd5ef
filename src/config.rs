//! Configuration types for the ruler widget.

use egui::Color32;

use crate::controllers::{CameraController, SessionController};
use crate::data::units::Unit;
use crate::events::EventController;

// ─────────────────────────────────────────────────────────────────────────────
// Feature flags
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle individual UI features on or off.
///
/// All features default to `true` (enabled). Disable features to embed a
/// minimal view; the session itself keeps working either way.
#[derive(Clone, Debug)]
pub struct FeatureFlags {
    /// Show the instruction/status footer.
    pub instruction_bar: bool,
    /// Show the camera on/off button in the footer.
    pub camera_toggle: bool,
    /// Show the plane-shift slider in the footer.
    pub plane_shift_control: bool,
    /// Draw the placed pins.
    pub pins: bool,
    /// Draw the line connecting a complete pair.
    pub connecting_lines: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            instruction_bar: true,
            camera_toggle: true,
            plane_shift_control: true,
            pins: true,
            connecting_lines: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plane-shift policy
// ─────────────────────────────────────────────────────────────────────────────

/// Slider bounds for the plane-shift control.
///
/// These are presentation policy, not core invariants: the session only
/// requires the effective distance to stay positive. The defaults keep the
/// slider from ever reaching an effective distance of zero.
#[derive(Clone, Copy, Debug)]
pub struct PlaneShiftPolicy {
    /// Fixed floor for moving the assumed plane closer (negative shift).
    pub backward_limit: f64,
    /// Fraction of the reference distance allowed as forward shift; the
    /// ceiling is `floor(reference_distance * forward_margin)`.
    pub forward_margin: f64,
}

impl Default for PlaneShiftPolicy {
    fn default() -> Self {
        Self {
            backward_limit: -200.0,
            forward_margin: 0.95,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay style
// ─────────────────────────────────────────────────────────────────────────────

/// Colors and stroke parameters for the pin/line overlay.
#[derive(Clone, Copy, Debug)]
pub struct OverlayStyle {
    /// Calibration pins and line.
    pub calibration_color: Color32,
    /// Measurement pins and line.
    pub measurement_color: Color32,
    pub pin_radius: f32,
    pub line_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            calibration_color: Color32::from_rgb(250, 204, 21),
            measurement_color: Color32::from_rgb(59, 130, 246),
            pin_radius: 6.0,
            line_width: 2.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Controllers sub-config
// ─────────────────────────────────────────────────────────────────────────────

/// Optional programmatic controllers attached to the widget.
#[derive(Clone, Default)]
pub struct Controllers {
    pub camera: Option<CameraController>,
    pub session: Option<SessionController>,
    pub event: Option<EventController>,
}

// ─────────────────────────────────────────────────────────────────────────────
// RulerConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the ruler widget.
///
/// | Field           | Purpose |
/// |-----------------|---------|
/// | `features`      | Toggle individual UI features on/off |
/// | `plane_shift`   | Slider bounds policy |
/// | `style`         | Overlay colors and strokes |
/// | `controllers`   | Programmatic interaction handles |
#[derive(Clone, Default)]
pub struct RulerConfig {
    /// Native window title (standalone mode).
    pub title: Option<String>,
    /// Unit the session resets to after camera-off and recalibration.
    pub default_unit: Unit,
    /// Plane-shift slider bounds.
    pub plane_shift: PlaneShiftPolicy,
    /// UI feature toggles.
    pub features: FeatureFlags,
    /// Overlay colors and strokes.
    pub style: OverlayStyle,
    /// Optional eframe native-window options (standalone mode).
    pub native_options: Option<eframe::NativeOptions>,
    /// External controllers for programmatic interaction.
    pub controllers: Controllers,
}
