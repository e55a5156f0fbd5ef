//! The seam between the widget and its overlay cards.

use crate::config::RulerConfig;
use crate::data::session::MeasureSession;

/// An interactive card floated over the camera view (the calibration form,
/// the result display). Cards decide their own visibility from the session
/// mode; clicks landing on them are overlay clicks, never pins.
pub trait Card {
    fn title(&self) -> &'static str;

    /// Whether the card should be shown for the current session state.
    fn visible(&self, session: &MeasureSession) -> bool;

    /// Render the card body. Runs only while [`visible`](Self::visible).
    fn show(&mut self, ui: &mut egui::Ui, session: &mut MeasureSession, cfg: &RulerConfig);
}
