//! The calibration input card.
//!
//! Shown once both calibration pins are placed. Collects the pinned
//! object's real length, its unit, and the camera-to-object distance; the
//! submit button stays disabled until both values parse as positive
//! numbers, so invalid input never reaches the session.

use super::card::Card;
use crate::config::RulerConfig;
use crate::data::session::{MeasureSession, SessionMode};
use crate::data::units::Unit;

/// Parse a user-entered number, accepting only finite positive values.
fn parse_positive(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

#[derive(Default)]
pub struct CalibrationCard {
    length_text: String,
    distance_text: String,
    unit: Unit,
}

impl CalibrationCard {
    /// The validated `(known_length, declared_distance)` pair, if both
    /// fields currently hold positive numbers.
    fn parsed(&self) -> Option<(f64, f64)> {
        Some((
            parse_positive(&self.length_text)?,
            parse_positive(&self.distance_text)?,
        ))
    }
}

impl Card for CalibrationCard {
    fn title(&self) -> &'static str {
        "Calibrate"
    }

    fn visible(&self, session: &MeasureSession) -> bool {
        session.mode() == SessionMode::CalibrateInput
    }

    fn show(&mut self, ui: &mut egui::Ui, session: &mut MeasureSession, _cfg: &RulerConfig) {
        ui.label("Enter the real-world length of the object you pinned, and how far your camera is from it.");
        ui.add_space(6.0);

        ui.label("Object's known length:");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.length_text)
                    .hint_text("e.g. 29.7")
                    .desired_width(120.0),
            );
            egui::ComboBox::from_id_salt("calibration-unit")
                .selected_text(self.unit.label())
                .show_ui(ui, |ui| {
                    for unit in Unit::ALL {
                        ui.selectable_value(&mut self.unit, unit, unit.label());
                    }
                });
        });

        ui.label(format!("Distance from object ({}):", self.unit));
        ui.add(
            egui::TextEdit::singleline(&mut self.distance_text)
                .hint_text("e.g. 50")
                .desired_width(120.0),
        );
        ui.add_space(6.0);

        let parsed = self.parsed();
        let submit = ui.add_enabled(parsed.is_some(), egui::Button::new("Calibrate"));
        if submit.clicked() {
            if let Some((length, distance)) = parsed {
                if session.handle_calibration_submit(length, self.unit, distance) {
                    self.length_text.clear();
                    self.distance_text.clear();
                }
            }
        }
    }
}
