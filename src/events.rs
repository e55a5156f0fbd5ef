//! Generic event system for the ruler widget.
//!
//! Hosts can subscribe to interaction and session events via
//! [`EventController`]. Each event carries a set of [`EventKind`] flags
//! (bitflags-style) so a single occurrence can match multiple categories —
//! a pin-placing click is both a `CLICK` and a `CALIBRATION_POINT` /
//! `MEASUREMENT_POINT` event.
//!
//! The caller specifies an [`EventFilter`] to receive only the events they
//! care about. The filter is a simple OR mask: an event is delivered when
//! `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;

use crate::data::point::Point;
use crate::data::scale::Baseline;
use crate::data::session::SessionMode;
use crate::data::units::Unit;

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the *categories* an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventKind(pub u64);

impl EventKind {
    /// A single (primary) click anywhere on the camera view.
    pub const CLICK: Self = Self(1 << 0);
    /// A calibration pin was placed (first or second).
    pub const CALIBRATION_POINT: Self = Self(1 << 1);
    /// A calibration baseline was established from the submitted form.
    pub const CALIBRATION_COMPLETE: Self = Self(1 << 2);
    /// A measurement pin was placed (first or second).
    pub const MEASUREMENT_POINT: Self = Self(1 << 3);
    /// A full measurement is now available.
    pub const MEASUREMENT_COMPLETE: Self = Self(1 << 4);
    /// The measurement pair was cleared (remeasure).
    pub const MEASUREMENT_CLEARED: Self = Self(1 << 5);
    /// The whole calibration was discarded (recalibrate).
    pub const RECALIBRATED: Self = Self(1 << 6);
    /// The session mode changed.
    pub const MODE_CHANGED: Self = Self(1 << 7);
    /// The capture stream became ready.
    pub const CAMERA_READY: Self = Self(1 << 8);
    /// Capture acquisition failed.
    pub const CAMERA_ERROR: Self = Self(1 << 9);
    /// The camera was switched on or off.
    pub const CAMERA_TOGGLED: Self = Self(1 << 10);
    /// The plane-shift value changed.
    pub const PLANE_SHIFT_CHANGED: Self = Self(1 << 11);
    /// The displayed distance was recomputed.
    pub const RESULT_UPDATED: Self = Self(1 << 12);

    /// Wildcard: matches *every* event kind.
    pub const ALL: Self = Self(u64::MAX);

    /// Combine two event kinds (bitwise OR).
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether `self` intersects with `other` (at least one bit in common).
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

const KIND_NAMES: &[(EventKind, &str)] = &[
    (EventKind::CLICK, "CLICK"),
    (EventKind::CALIBRATION_POINT, "CALIBRATION_POINT"),
    (EventKind::CALIBRATION_COMPLETE, "CALIBRATION_COMPLETE"),
    (EventKind::MEASUREMENT_POINT, "MEASUREMENT_POINT"),
    (EventKind::MEASUREMENT_COMPLETE, "MEASUREMENT_COMPLETE"),
    (EventKind::MEASUREMENT_CLEARED, "MEASUREMENT_CLEARED"),
    (EventKind::RECALIBRATED, "RECALIBRATED"),
    (EventKind::MODE_CHANGED, "MODE_CHANGED"),
    (EventKind::CAMERA_READY, "CAMERA_READY"),
    (EventKind::CAMERA_ERROR, "CAMERA_ERROR"),
    (EventKind::CAMERA_TOGGLED, "CAMERA_TOGGLED"),
    (EventKind::PLANE_SHIFT_CHANGED, "PLANE_SHIFT_CHANGED"),
    (EventKind::RESULT_UPDATED, "RESULT_UPDATED"),
];

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }
        let mut remaining = self.0;
        let mut first = true;
        for (kind, name) in KIND_NAMES {
            if self.contains(*kind) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
                remaining &= !kind.0;
            }
        }
        if remaining != 0 {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{remaining:#x}")?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Where a click landed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClickMeta {
    pub point: Point,
    /// The click targeted an interactive overlay surface and was therefore
    /// not interpreted as a pin.
    pub on_overlay: bool,
}

/// A pin placed into one of the two pairs.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PinMeta {
    pub point: Point,
    /// 0 for the first pin of the pair, 1 for the second.
    pub index: usize,
}

/// The baseline established by a calibration submission.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalibrationMeta {
    pub baseline: Baseline,
}

/// A reported (or refreshed) measurement result.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResultMeta {
    pub distance: f64,
    pub unit: Unit,
    pub plane_shift: f64,
}

/// Camera flag / acquisition status.
#[derive(Debug, Clone, Serialize)]
pub struct CameraMeta {
    pub on: bool,
    pub error: Option<String>,
}

/// A session mode transition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModeMeta {
    pub from: SessionMode,
    pub to: SessionMode,
}

/// A plane-shift slider change.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlaneShiftMeta {
    pub value: f64,
}

/// A single event occurrence with its categories and optional metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RulerEvent {
    /// The categories this event belongs to.
    pub kinds: EventKind,
    /// Seconds since the controller was created.
    pub timestamp: f64,

    pub click: Option<ClickMeta>,
    pub pin: Option<PinMeta>,
    pub calibration: Option<CalibrationMeta>,
    pub result: Option<ResultMeta>,
    pub camera: Option<CameraMeta>,
    pub mode: Option<ModeMeta>,
    pub plane_shift: Option<PlaneShiftMeta>,
}

impl RulerEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            click: None,
            pin: None,
            calibration: None,
            result: None,
            camera: None,
            mode: None,
            plane_shift: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask deciding which events a subscriber receives.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    mask: EventKind,
}

impl EventFilter {
    /// Receive only events intersecting `mask`.
    pub fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    /// Receive every event.
    pub fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub fn matches(&self, event: &RulerEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscription {
    filter: EventFilter,
    sender: Sender<RulerEvent>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscription>,
    start_instant: Instant,
}

/// Dispatches [`RulerEvent`]s to any number of filtered subscribers.
///
/// Clone handles freely; all clones share the subscriber list. Receivers
/// whose channel was dropped are pruned on the next matching emit.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: Instant::now(),
            })),
        }
    }

    /// Subscribe with a filter; the receiver gets every matching event.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<RulerEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.push(Subscription { filter, sender: tx });
        rx
    }

    /// Subscribe to every event.
    pub fn subscribe_all(&self) -> Receiver<RulerEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Emit to subscribers whose filter matches, stamping the timestamp.
    pub(crate) fn emit_filtered(&self, mut event: RulerEvent) {
        let mut inner = self.inner.lock().unwrap();
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_union_and_intersection() {
        let click = EventKind::CLICK;
        let pin = EventKind::CALIBRATION_POINT;
        let combined = click | pin;
        assert!(combined.contains(click));
        assert!(combined.contains(pin));
        assert!(combined.intersects(click));
        assert!(!EventKind::CAMERA_READY.intersects(click));
    }

    #[test]
    fn event_kind_all_matches_everything() {
        assert!(EventKind::ALL.contains(EventKind::CLICK));
        assert!(EventKind::ALL.contains(EventKind::RESULT_UPDATED));
        assert!(EventKind::ALL.contains(EventKind::CAMERA_ERROR));
    }

    #[test]
    fn event_filter_matches() {
        let filter = EventFilter::only(EventKind::CLICK | EventKind::MEASUREMENT_POINT);
        let evt = RulerEvent::new(EventKind::CLICK);
        assert!(filter.matches(&evt));

        let evt2 = RulerEvent::new(EventKind::CAMERA_TOGGLED);
        assert!(!filter.matches(&evt2));

        let evt3 = RulerEvent::new(EventKind::CLICK | EventKind::MEASUREMENT_POINT);
        assert!(filter.matches(&evt3));
    }

    #[test]
    fn event_controller_subscribe_and_emit() {
        let ctrl = EventController::new();
        let rx_all = ctrl.subscribe_all();
        let rx_clicks = ctrl.subscribe(EventFilter::only(EventKind::CLICK));
        let rx_camera = ctrl.subscribe(EventFilter::only(EventKind::CAMERA_TOGGLED));

        ctrl.emit_filtered(RulerEvent::new(EventKind::CLICK));

        assert!(rx_all.try_recv().is_ok());
        assert!(rx_clicks.try_recv().is_ok());
        assert!(rx_camera.try_recv().is_err());
    }

    #[test]
    fn event_controller_combined_kinds() {
        let ctrl = EventController::new();
        let rx_click = ctrl.subscribe(EventFilter::only(EventKind::CLICK));
        let rx_pin = ctrl.subscribe(EventFilter::only(EventKind::CALIBRATION_POINT));

        ctrl.emit_filtered(RulerEvent::new(
            EventKind::CLICK | EventKind::CALIBRATION_POINT,
        ));

        assert!(rx_click.try_recv().is_ok());
        assert!(rx_pin.try_recv().is_ok());
    }

    #[test]
    fn event_controller_timestamp_set_on_emit() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe_all();

        std::thread::sleep(std::time::Duration::from_millis(10));
        ctrl.emit_filtered(RulerEvent::new(EventKind::CLICK));

        let evt = rx.try_recv().unwrap();
        assert!(evt.timestamp > 0.0);
    }

    #[test]
    fn event_kind_display() {
        assert_eq!(format!("{}", EventKind::CLICK), "CLICK");
        let combo = EventKind::CLICK | EventKind::RESULT_UPDATED;
        assert_eq!(format!("{}", combo), "CLICK|RESULT_UPDATED");
        assert_eq!(format!("{}", EventKind::ALL), "ALL");
        let unknown = EventKind(1 << 63);
        assert!(format!("{}", unknown).contains("0x"));
    }

    #[test]
    fn event_kinds_do_not_overlap() {
        for (i, (a, _)) in KIND_NAMES.iter().enumerate() {
            for (j, (b, _)) in KIND_NAMES.iter().enumerate() {
                if i != j {
                    assert!(
                        !a.intersects(*b),
                        "EventKind bits {} and {} overlap: {:b} & {:b}",
                        i,
                        j,
                        a.0,
                        b.0
                    );
                }
            }
        }
    }

    #[test]
    fn dropped_receiver_is_cleaned_up() {
        let ctrl = EventController::new();
        let rx1 = ctrl.subscribe_all();
        let rx2 = ctrl.subscribe_all();

        drop(rx1);

        ctrl.emit_filtered(RulerEvent::new(EventKind::CLICK));
        assert!(rx2.try_recv().is_ok());

        ctrl.emit_filtered(RulerEvent::new(EventKind::CAMERA_TOGGLED));
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn ruler_event_carries_metadata() {
        let mut evt = RulerEvent::new(EventKind::CLICK | EventKind::MEASUREMENT_POINT);
        evt.click = Some(ClickMeta {
            point: Point::new(100.0, 200.0),
            on_overlay: false,
        });
        evt.pin = Some(PinMeta {
            point: Point::new(100.0, 200.0),
            index: 0,
        });

        assert!(evt.kinds.contains(EventKind::CLICK));
        assert_eq!(evt.pin.unwrap().index, 0);
        assert_eq!(evt.click.unwrap().point, Point::new(100.0, 200.0));
    }
}
