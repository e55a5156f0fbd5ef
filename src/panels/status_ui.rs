//! The instruction/status footer.

use crate::data::session::{MeasureSession, SessionMode};

/// What the user should do next, per mode.
pub fn instruction_text(mode: SessionMode, error: Option<&str>) -> String {
    match mode {
        SessionMode::Start => "Starting camera...".to_string(),
        SessionMode::CameraOff => "Camera is off. Turn it on to begin measuring.".to_string(),
        SessionMode::CameraError => format!(
            "Camera error: {}",
            error.unwrap_or("Could not access camera.")
        ),
        SessionMode::CalibrateStep1 => {
            "Place the first pin on one end of an object with a known length.".to_string()
        }
        SessionMode::CalibrateStep2 => {
            "Place the second pin on the other end of the object.".to_string()
        }
        SessionMode::CalibrateInput => {
            "Enter the object's details to calibrate the scale.".to_string()
        }
        SessionMode::MeasureStep1 => {
            "Calibration complete! Place the first pin to start measuring.".to_string()
        }
        SessionMode::MeasureStep2 => {
            "Place the second pin to finish the measurement.".to_string()
        }
        SessionMode::ShowResult => "Measurement successful!".to_string(),
    }
}

/// What the footer asked for this frame.
#[derive(Default)]
pub struct StatusResponse {
    pub toggle_camera: bool,
}

/// Render the heading, the per-mode instruction and the camera button.
pub fn show(ui: &mut egui::Ui, session: &MeasureSession, show_toggle: bool) -> StatusResponse {
    let mut response = StatusResponse::default();

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.strong("Pixel Ruler");
            let text = instruction_text(session.mode(), session.camera_error());
            if session.mode() == SessionMode::CameraError {
                ui.colored_label(egui::Color32::LIGHT_RED, text);
            } else {
                ui.label(text);
            }
        });
        if show_toggle {
            let icon = if session.is_camera_on() {
                egui_phosphor::regular::VIDEO_CAMERA
            } else {
                egui_phosphor::regular::VIDEO_CAMERA_SLASH
            };
            let hover = if session.is_camera_on() {
                "Turn camera off"
            } else {
                "Turn camera on"
            };
            if ui.button(icon.to_string()).on_hover_text(hover).clicked() {
                response.toggle_camera = true;
            }
        }
    });

    response
}
