//! The measurement result card.

use super::card::Card;
use crate::config::RulerConfig;
use crate::data::session::{MeasureSession, SessionMode};
use crate::data::units::Unit;

/// Format a reported distance for display: two decimals plus the unit label.
pub fn format_distance(distance: f64, unit: Unit) -> String {
    format!("{distance:.2} {unit}")
}

#[derive(Default)]
pub struct ResultCard;

impl Card for ResultCard {
    fn title(&self) -> &'static str {
        "Measurement"
    }

    fn visible(&self, session: &MeasureSession) -> bool {
        session.mode() == SessionMode::ShowResult && session.measured_distance().is_some()
    }

    fn show(&mut self, ui: &mut egui::Ui, session: &mut MeasureSession, _cfg: &RulerConfig) {
        let Some(distance) = session.measured_distance() else {
            return;
        };
        ui.vertical_centered(|ui| {
            ui.label("Measured length");
            ui.heading(format_distance(distance, session.unit()));
        });
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .button(format!("{} Measure again", egui_phosphor::regular::RULER))
                .clicked()
            {
                session.remeasure();
            }
            if ui
                .button(format!(
                    "{} Recalibrate",
                    egui_phosphor::regular::ARROWS_COUNTER_CLOCKWISE
                ))
                .clicked()
            {
                session.recalibrate();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_formatted_with_two_decimals_and_unit() {
        assert_eq!(format_distance(10.0, Unit::Cm), "10.00 cm");
        assert_eq!(format_distance(3.14159, Unit::In), "3.14 in");
        assert_eq!(format_distance(0.5, Unit::M), "0.50 m");
    }
}
