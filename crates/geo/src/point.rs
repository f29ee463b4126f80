use serde::{Deserialize, Serialize};

use crate::motion::normalize_heading;

/// Mean Earth radius in kilometres, as used by the Haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS-84 coordinate pair.
///
/// Validity (`is_valid`) is a precondition for the distance and bearing
/// operations; neither checks its input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,

    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both coordinates are finite and within WGS-84 range.
    #[must_use]
    pub fn is_valid(self) -> bool {
        is_valid_point(self.latitude, self.longitude)
    }

    /// Great-circle distance to `other` in kilometres (Haversine).
    ///
    /// Symmetric, and zero for identical points up to floating precision.
    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }

    /// Initial compass bearing when travelling towards `other`, in
    /// `[0, 360)` degrees. Not symmetric.
    #[must_use]
    pub fn bearing_deg(self, other: Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let y = d_lng.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
        normalize_heading(y.atan2(x).to_degrees())
    }

    /// True when the point lies within `radius_km` of `center`.
    #[must_use]
    pub fn within_geofence(self, center: Self, radius_km: f64) -> bool {
        self.distance_km(center) <= radius_km
    }
}

/// Universal coordinate gate: both values finite and within WGS-84 range.
#[must_use]
pub fn is_valid_point(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
