//! The plane-shift slider.
//!
//! Lets the user assert that the camera moved closer to or further from
//! the measurement plane since calibration, re-projecting the scale
//! without recalibrating. Integer-stepped; the bounds keep the effective
//! distance strictly positive.

use std::ops::RangeInclusive;

use crate::config::PlaneShiftPolicy;
use crate::data::session::MeasureSession;

/// Slider bounds for a given calibration reference distance: floor at the
/// fixed backward limit, ceiling just short of pulling the plane onto the
/// camera.
pub fn slider_bounds(policy: &PlaneShiftPolicy, reference_distance: f64) -> RangeInclusive<i64> {
    let max = (reference_distance * policy.forward_margin).floor() as i64;
    (policy.backward_limit as i64)..=max
}

/// Render the slider. Returns `true` when the value changed (the session
/// has already recomputed its result by then).
pub fn show(ui: &mut egui::Ui, session: &mut MeasureSession, policy: &PlaneShiftPolicy) -> bool {
    let Some(reference) = session.reference_distance() else {
        ui.weak("Calibrate to enable measurement controls");
        return false;
    };

    let bounds = slider_bounds(policy, reference);
    let mut shift = session.plane_shift().round() as i64;

    let mut changed = false;
    ui.vertical(|ui| {
        ui.label("Adjust camera distance from measurement plane");
        ui.horizontal(|ui| {
            ui.weak("Closer");
            let response = ui.add(egui::Slider::new(&mut shift, bounds).show_value(false));
            ui.weak("Further");
            if response.changed() {
                session.set_plane_shift(shift as f64);
                changed = true;
            }
        });
        let unit = session.unit();
        ui.strong(if shift >= 0 {
            format!("+{shift} {unit}")
        } else {
            format!("{shift} {unit}")
        });
    });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_floor_is_the_backward_limit() {
        let policy = PlaneShiftPolicy::default();
        assert_eq!(*slider_bounds(&policy, 50.0).start(), -200);
        assert_eq!(*slider_bounds(&policy, 1000.0).start(), -200);
    }

    #[test]
    fn bounds_ceiling_stays_short_of_zero_distance() {
        let policy = PlaneShiftPolicy::default();
        // floor(50 * 0.95) = 47: effective distance can never hit zero.
        assert_eq!(*slider_bounds(&policy, 50.0).end(), 47);
        assert_eq!(*slider_bounds(&policy, 100.0).end(), 95);
    }
}
