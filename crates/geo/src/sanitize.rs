use serde::{Deserialize, Serialize};

use crate::motion::normalize_heading;

/// Telemetry fragment as it arrives from a cache or dashboard layer, with
/// any subset of its numeric fields present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPosition {
    /// Latitude in decimal degrees, when reported.
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees, when reported.
    pub longitude: Option<f64>,

    /// Speed in km/h, when reported.
    pub speed_kph: Option<f64>,

    /// Heading in degrees, when reported. Any real value is accepted.
    pub heading_deg: Option<f64>,

    /// Fuel level percentage, when reported. May be out of range.
    pub fuel_level_pct: Option<f64>,
}

/// Fully populated, range-clamped counterpart of [`PartialPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kph: f64,
    pub heading_deg: f64,
    pub fuel_level_pct: f64,
}

impl PartialPosition {
    /// Fills out a fragment that must be rendered even when partially
    /// malformed: missing or non-finite numerics become 0, fuel is clamped to
    /// `[0, 100]` and the heading is wrapped into `[0, 360)`. Never fails.
    #[must_use]
    pub fn sanitize(&self) -> PositionFix {
        PositionFix {
            latitude: finite_or_zero(self.latitude),
            longitude: finite_or_zero(self.longitude),
            speed_kph: finite_or_zero(self.speed_kph),
            heading_deg: normalize_heading(finite_or_zero(self.heading_deg)),
            fuel_level_pct: finite_or_zero(self.fuel_level_pct).clamp(0.0, 100.0),
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
