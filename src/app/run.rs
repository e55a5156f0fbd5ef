//! Top-level entry point for running the ruler as a native window.

use eframe::egui;

use crate::capture::CaptureCommand;
use crate::config::RulerConfig;

use super::{RulerApp, RulerPanel};

/// Launch the ruler in a native window.
///
/// 1. Constructs a [`RulerPanel`] from `cfg` (wiring any controllers).
/// 2. Opens a native window and enters the eframe event loop.
///
/// The call blocks until the window is closed.
pub fn run_ruler(
    rx: std::sync::mpsc::Receiver<CaptureCommand>,
    mut cfg: RulerConfig,
) -> eframe::Result<()> {
    let title = cfg.title.take().unwrap_or_else(|| "Pixel Ruler".to_string());
    let mut opts = cfg.native_options.take().unwrap_or_default();

    // A comfortable default window size if the config does not set one.
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1280.0, 800.0));
    }

    let app = RulerApp::new(RulerPanel::with_config(rx, cfg));

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install the Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
