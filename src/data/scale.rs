//! The scale engine: pure functions deriving scales and distances.
//!
//! The optical model is a pinhole approximation: the apparent size of an
//! object is inversely proportional to its distance from the camera, so a
//! pixels-per-unit scale captured at one distance re-projects linearly to
//! another. This is intentionally the only model supported; there is no
//! lens-distortion or perspective correction.

use serde::{Deserialize, Serialize};

use super::point::PointPair;
use super::units::Unit;

/// The scale captured at calibration time.
///
/// Created only by a successful calibration submission and invalidated on
/// recalibration or camera-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Pixel span of the calibration pair divided by the declared physical
    /// length. Always finite and positive.
    pub pixels_per_unit: f64,
    /// The user-declared camera-to-object distance at calibration time, in
    /// the same unit. Always positive.
    pub reference_distance: f64,
    /// The unit label the reference length was declared in.
    pub unit: Unit,
}

/// Derive a [`Baseline`] from a complete calibration pair and the declared
/// physical length and distance.
///
/// Returns `None` unless the pair holds exactly two points and both
/// `known_length` and `declared_distance` are positive. Callers validate
/// input before invoking; this is the last line of defense, not an error
/// channel.
pub fn compute_baseline(
    pair: &PointPair,
    known_length: f64,
    declared_distance: f64,
    unit: Unit,
) -> Option<Baseline> {
    if known_length <= 0.0 || declared_distance <= 0.0 {
        return None;
    }
    let span = pair.span()?;
    Some(Baseline {
        pixels_per_unit: span / known_length,
        reference_distance: declared_distance,
        unit,
    })
}

/// The pixels-per-unit value in effect after shifting the assumed
/// camera-to-plane distance by `plane_shift` relative to the baseline.
///
/// `None` when no baseline exists or the shifted distance is not positive.
/// Where defined, the scale is strictly decreasing in `plane_shift`:
/// moving the camera further away makes each pixel span more real length.
pub fn effective_scale(baseline: Option<&Baseline>, plane_shift: f64) -> Option<f64> {
    let baseline = baseline?;
    let effective_distance = baseline.reference_distance + plane_shift;
    if effective_distance <= 0.0 {
        return None;
    }
    Some(baseline.pixels_per_unit * baseline.reference_distance / effective_distance)
}

/// Real-world length of a complete measurement pair under `scale`.
///
/// `None` unless the pair is complete and `scale` is finite and positive.
pub fn compute_distance(pair: &PointPair, scale: f64) -> Option<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    pair.span().map(|span| span / scale)
}
