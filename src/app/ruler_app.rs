//! Standalone application wrapper.
//!
//! [`RulerApp`] wraps a [`RulerPanel`](super::RulerPanel) and implements
//! [`eframe::App`] so the ruler can run as a native window.

use eframe::egui;

use super::RulerPanel;

/// Standalone ruler application that implements [`eframe::App`].
pub struct RulerApp {
    /// The inner panel widget that owns all data and UI state.
    pub panel: RulerPanel,
}

impl RulerApp {
    pub fn new(panel: RulerPanel) -> Self {
        Self { panel }
    }
}

impl eframe::App for RulerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.panel.update(ui);
            });
        // Frames arrive between UI events; keep painting so the newest
        // one shows without waiting for input.
        if self.panel.session.is_camera_on() {
            ctx.request_repaint_after(std::time::Duration::from_millis(33));
        }
    }
}
