//! Main application module for the ruler widget.
//!
//! | Sub-module   | Responsibility |
//! | ------------ | -------------- |
//! | [`update`]   | Per-frame capture ingestion, interaction, and rendering |
//! | [`ruler_app`]| Standalone [`RulerApp`] (eframe) wrapper |
//! | [`run`]      | Top-level [`run_ruler()`] entry point |

mod ruler_app;
mod run;
mod update;

pub use ruler_app::RulerApp;
pub use run::run_ruler;

use std::sync::mpsc::Receiver;

use crate::capture::{CaptureCommand, CaptureStream};
use crate::config::RulerConfig;
use crate::controllers::{CameraController, SessionController};
use crate::data::session::{MeasureSession, SessionMode};
use crate::events::EventController;
use crate::panels::{CalibrationCard, Card, ResultCard};

/// The central widget: owns the session, the capture receiver, the most
/// recent camera frame and the overlay cards.
///
/// `RulerPanel` can be used:
///
/// * **Standalone** – wrapped in [`RulerApp`] and driven by the eframe
///   event loop (see [`run_ruler`]).
/// * **Embedded** – placed inside a parent egui application by calling
///   [`RulerPanel::update`] from any `Ui` each frame.
pub struct RulerPanel {
    /// The interaction state machine. Public so hosts can inspect it
    /// (mode, pins, result) between frames.
    pub session: MeasureSession,

    /// Capture command channel from the capture collaborator.
    pub(crate) rx: Receiver<CaptureCommand>,
    /// The releasable device guard handed over by `Ready`. Held for the
    /// active lifetime of the capture; stopped and dropped on camera-off.
    pub(crate) stream: Option<Box<dyn CaptureStream>>,
    /// Texture holding the most recent frame.
    pub(crate) texture: Option<egui::TextureHandle>,

    /// Overlay cards (calibration form, result display).
    pub(crate) cards: Vec<Box<dyn Card>>,
    /// Card rectangles from the previous frame, used to classify clicks
    /// as overlay-targeted.
    pub(crate) card_rects: Vec<egui::Rect>,

    /// Everything configurable: features, plane-shift policy, style.
    pub cfg: RulerConfig,

    pub(crate) camera_ctrl: Option<CameraController>,
    pub(crate) session_ctrl: Option<SessionController>,
    pub(crate) event_ctrl: Option<EventController>,

    /// Mode at the end of the previous frame, for MODE_CHANGED events.
    pub(crate) last_mode: SessionMode,
}

impl RulerPanel {
    /// Create a panel with default configuration, receiving
    /// [`CaptureCommand`]s from the given channel.
    pub fn new(rx: Receiver<CaptureCommand>) -> Self {
        Self::with_config(rx, RulerConfig::default())
    }

    /// Create a panel from a full [`RulerConfig`]; controllers present in
    /// the config are wired up.
    pub fn with_config(rx: Receiver<CaptureCommand>, mut cfg: RulerConfig) -> Self {
        let camera_ctrl = cfg.controllers.camera.take();
        let session_ctrl = cfg.controllers.session.take();
        let event_ctrl = cfg.controllers.event.take();
        let session = MeasureSession::with_default_unit(cfg.default_unit);
        let last_mode = session.mode();
        Self {
            session,
            rx,
            stream: None,
            texture: None,
            cards: vec![
                Box::new(CalibrationCard::default()),
                Box::new(ResultCard),
            ],
            card_rects: Vec::new(),
            cfg,
            camera_ctrl,
            session_ctrl,
            event_ctrl,
            last_mode,
        }
    }

    /// Attach controllers after construction (embedded usage).
    pub fn set_controllers(
        &mut self,
        camera_ctrl: Option<CameraController>,
        session_ctrl: Option<SessionController>,
    ) {
        self.camera_ctrl = camera_ctrl;
        self.session_ctrl = session_ctrl;
    }

    /// Attach an event controller for event dispatch.
    pub fn set_event_controller(&mut self, event_ctrl: Option<EventController>) {
        self.event_ctrl = event_ctrl;
    }
}
