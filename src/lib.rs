//! PixelRuler crate root: re-exports and module wiring.
//!
//! An egui/eframe widget that estimates real-world lengths from a camera
//! feed: pin two points on an object of known length to calibrate a
//! pixels-per-unit scale, then pin two points on anything else to measure
//! it. A plane-shift control re-projects the scale when the camera's
//! distance to the measurement plane changes.
//!
//! Module map:
//! - `data`: the session state machine and the scale math
//! - `capture`: channel types to feed camera signals and frames
//! - `events`: filtered event subscriptions for host code
//! - `controllers`: programmatic camera/session control
//! - `panels`: overlay cards, footer controls, pin painting
//! - `app`: the embeddable [`RulerPanel`], standalone [`RulerApp`] and
//!   [`run_ruler`]

pub mod app;
pub mod capture;
pub mod config;
pub mod controllers;
pub mod data;
pub mod events;
pub mod panels;

// Public re-exports for a compact external API
pub use app::{run_ruler, RulerApp, RulerPanel};
pub use capture::{channel, CameraFrame, CameraSink, CaptureCommand, CaptureError, CaptureStream, NullStream};
pub use config::{FeatureFlags, OverlayStyle, PlaneShiftPolicy, RulerConfig};
pub use controllers::{CameraController, CameraInfo, SessionController, SessionSnapshot};
pub use data::point::{pixel_distance, Point, PointPair};
pub use data::scale::{compute_baseline, compute_distance, effective_scale, Baseline};
pub use data::session::{MeasureSession, SessionMode};
pub use data::units::Unit;
pub use events::{EventController, EventFilter, EventKind, RulerEvent};
