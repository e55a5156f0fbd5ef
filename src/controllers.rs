//! Controllers for interacting with the widget from external code.
//!
//! The controllers expose lightweight state and a subscription mechanism so
//! non-UI code can observe the session and push simple requests (toggle the
//! camera, remeasure, nudge the plane shift). Requests are recorded here and
//! applied by the widget once per frame; observed state flows back to
//! subscribers whenever it changes.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::data::session::SessionMode;
use crate::data::units::Unit;

// ─────────────────────────────────────────────────────────────────────────────
// CameraController
// ─────────────────────────────────────────────────────────────────────────────

/// Last observed camera status.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub on: bool,
    pub mode: SessionMode,
    /// The acquisition error message, if the session is in the error mode.
    pub error: Option<String>,
}

pub(crate) struct CameraCtrlInner {
    pub(crate) request_set_on: Option<bool>,
    pub(crate) request_toggle: bool,
    pub(crate) last: Option<CameraInfo>,
    pub(crate) listeners: Vec<Sender<CameraInfo>>,
}

/// Programmatic camera switch: request on/off/toggle, observe status.
#[derive(Clone)]
pub struct CameraController {
    pub(crate) inner: Arc<Mutex<CameraCtrlInner>>, // crate-visible for the widget
}

impl CameraController {
    /// Create a fresh controller.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CameraCtrlInner {
                request_set_on: None,
                request_toggle: false,
                last: None,
                listeners: Vec::new(),
            })),
        }
    }

    /// Request the camera on. Applied by the widget on its next frame.
    pub fn turn_on(&self) {
        self.inner.lock().unwrap().request_set_on = Some(true);
    }

    /// Request the camera off. Clears the session like the UI button does.
    pub fn turn_off(&self) {
        self.inner.lock().unwrap().request_set_on = Some(false);
    }

    /// Request a flip of the camera flag.
    pub fn toggle(&self) {
        self.inner.lock().unwrap().request_toggle = true;
    }

    /// Last observed status (if the widget has published one yet).
    pub fn info(&self) -> Option<CameraInfo> {
        self.inner.lock().unwrap().last.clone()
    }

    /// Subscribe to status updates; one message per observed change.
    pub fn subscribe(&self) -> Receiver<CameraInfo> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.inner.lock().unwrap().listeners.push(tx);
        rx
    }

    /// Take pending requests: `(set_on, toggle)`.
    pub(crate) fn take_requests(&self) -> (Option<bool>, bool) {
        let mut inner = self.inner.lock().unwrap();
        (inner.request_set_on.take(), std::mem::take(&mut inner.request_toggle))
    }

    /// Publish the current status if it changed since the last publish.
    pub(crate) fn publish(&self, info: CameraInfo) {
        let mut inner = self.inner.lock().unwrap();
        if inner.last.as_ref() == Some(&info) {
            return;
        }
        inner.last = Some(info.clone());
        inner.listeners.retain(|tx| tx.send(info.clone()).is_ok());
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SessionController
// ─────────────────────────────────────────────────────────────────────────────

/// A point-in-time view of the session, published to subscribers whenever
/// any field changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub unit: Unit,
    pub plane_shift: f64,
    pub measured_distance: Option<f64>,
    pub reference_distance: Option<f64>,
}

pub(crate) struct SessionCtrlInner {
    pub(crate) request_remeasure: bool,
    pub(crate) request_recalibrate: bool,
    pub(crate) request_plane_shift: Option<f64>,
    pub(crate) last: Option<SessionSnapshot>,
    pub(crate) listeners: Vec<Sender<SessionSnapshot>>,
}

/// Programmatic session control: remeasure, recalibrate, set the plane
/// shift, and observe the session as [`SessionSnapshot`]s.
#[derive(Clone)]
pub struct SessionController {
    pub(crate) inner: Arc<Mutex<SessionCtrlInner>>, // crate-visible for the widget
}

impl SessionController {
    /// Create a fresh controller.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionCtrlInner {
                request_remeasure: false,
                request_recalibrate: false,
                request_plane_shift: None,
                last: None,
                listeners: Vec::new(),
            })),
        }
    }

    /// Request a remeasure (same as the result card's button). Honored
    /// only while a result is showing.
    pub fn remeasure(&self) {
        self.inner.lock().unwrap().request_remeasure = true;
    }

    /// Request a recalibration. Honored from the measuring/result modes.
    pub fn recalibrate(&self) {
        self.inner.lock().unwrap().request_recalibrate = true;
    }

    /// Request a plane-shift change, as if the slider was moved.
    pub fn set_plane_shift(&self, value: f64) {
        self.inner.lock().unwrap().request_plane_shift = Some(value);
    }

    /// Last published snapshot (if any).
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.inner.lock().unwrap().last.clone()
    }

    /// Subscribe to snapshots; one message per observed change.
    pub fn subscribe(&self) -> Receiver<SessionSnapshot> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.inner.lock().unwrap().listeners.push(tx);
        rx
    }

    /// Take pending requests: `(remeasure, recalibrate, plane_shift)`.
    pub(crate) fn take_requests(&self) -> (bool, bool, Option<f64>) {
        let mut inner = self.inner.lock().unwrap();
        (
            std::mem::take(&mut inner.request_remeasure),
            std::mem::take(&mut inner.request_recalibrate),
            inner.request_plane_shift.take(),
        )
    }

    /// Publish the current snapshot if it changed since the last publish.
    pub(crate) fn publish(&self, snapshot: SessionSnapshot) {
        let mut inner = self.inner.lock().unwrap();
        if inner.last.as_ref() == Some(&snapshot) {
            return;
        }
        inner.last = Some(snapshot.clone());
        inner
            .listeners
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
