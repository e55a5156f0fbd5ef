//! The closed set of length-unit labels.
//!
//! Units are opaque display tokens: the crate never converts between them.
//! The label entered at calibration time simply tags every reported
//! distance until the next recalibration or camera-off reset.

use serde::{Deserialize, Serialize};

/// Recognized unit labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Centimeter ("cm") — the default.
    #[default]
    Cm,
    /// Meter ("m").
    M,
    /// Inch ("in").
    In,
    /// Foot ("ft").
    Ft,
}

impl Unit {
    /// Every recognized unit, in display order (for combo boxes).
    pub const ALL: [Unit; 4] = [Unit::Cm, Unit::M, Unit::In, Unit::Ft];

    /// The short display token.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Cm => "cm",
            Unit::M => "m",
            Unit::In => "in",
            Unit::Ft => "ft",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_the_short_tokens() {
        let labels: Vec<&str> = Unit::ALL.iter().map(|u| u.label()).collect();
        assert_eq!(labels, ["cm", "m", "in", "ft"]);
    }

    #[test]
    fn default_unit_is_cm() {
        assert_eq!(Unit::default(), Unit::Cm);
    }
}
