use chrono::{DateTime, Utc};
use geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Canonical GPS reading produced by the normalizer.
///
/// Construction is the validation gate: a reading handed to callers always
/// has every field populated and within its declared range. Readings are
/// never mutated after construction; deduplication and storage belong to
/// the downstream time-series layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsReading {
    /// Identifier of the tracked vehicle. Never empty.
    pub vehicle_id: String,

    /// Validated WGS-84 position.
    pub position: GeoPoint,

    /// Speed over ground in km/h. Never negative.
    pub speed_kph: f64,

    /// Heading in `[0, 360)` degrees.
    pub heading_deg: f64,

    /// Fuel level percentage in `[0, 100]`.
    pub fuel_level_pct: f64,

    /// Whether the ignition was on when the reading was taken.
    pub ignition_on: bool,

    /// UTC instant the reading was observed.
    pub observed_at: DateTime<Utc>,
}

impl GpsReading {
    /// Re-checks every field against its declared range.
    ///
    /// Normalization never produces an invalid reading; this second gate
    /// exists for hand-built readings that bypass the normalizer on their
    /// way to storage.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.vehicle_id.is_empty()
            && self.position.is_valid()
            && self.speed_kph.is_finite()
            && self.speed_kph >= 0.0
            && (0.0..360.0).contains(&self.heading_deg)
            && (0.0..=100.0).contains(&self.fuel_level_pct)
    }
}
