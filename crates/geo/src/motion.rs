use std::fmt;

use serde::{Deserialize, Serialize};

/// Kilometres per statute mile.
pub const KMH_PER_MPH: f64 = 1.60934;

/// Speed below which a powered vehicle is treated as idling. Separates GPS
/// jitter from real movement.
pub const MOVING_SPEED_KPH: f64 = 5.0;

/// Average road speed assumed when the caller supplies no estimate.
pub const DEFAULT_AVG_SPEED_KPH: f64 = 60.0;

/// Reduces any heading into `[0, 360)` degrees. Non-finite input yields 0.
#[must_use]
pub fn normalize_heading(heading_deg: f64) -> f64 {
    if !heading_deg.is_finite() {
        return 0.0;
    }

    // rem_euclid can round a tiny negative up to the modulus itself
    let wrapped = heading_deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Converts miles per hour to kilometres per hour.
#[must_use]
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KMH_PER_MPH
}

/// Converts kilometres per hour to miles per hour.
#[must_use]
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / KMH_PER_MPH
}

/// Estimated travel time in whole minutes at the default average speed.
#[must_use]
pub fn eta_minutes(distance_km: f64) -> u32 {
    eta_minutes_at(distance_km, DEFAULT_AVG_SPEED_KPH)
}

/// Estimated travel time in whole minutes at `avg_speed_kmh`.
///
/// A zero (or otherwise unusable) speed yields 0 rather than a division
/// error.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eta_minutes_at(distance_km: f64, avg_speed_kmh: f64) -> u32 {
    if avg_speed_kmh <= 0.0 || !avg_speed_kmh.is_finite() {
        return 0;
    }
    (distance_km / avg_speed_kmh * 60.0).round() as u32
}

/// Eight-way compass rose bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        };
        f.write_str(label)
    }
}

/// Buckets a heading into the nearest of the eight compass directions.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compass_direction(heading_deg: f64) -> CompassDirection {
    const ROSE: [CompassDirection; 8] = [
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
    ];

    let bucket = (normalize_heading(heading_deg) / 45.0).round() as usize % ROSE.len();
    ROSE[bucket]
}

/// Coarse movement classification derived from ignition state and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    /// Ignition off, regardless of any reported speed.
    Off,

    /// Ignition on, speed at or below the jitter threshold.
    Idle,

    /// Ignition on and genuinely moving.
    Moving,
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Off => "off",
            Self::Idle => "idle",
            Self::Moving => "moving",
        };
        f.write_str(label)
    }
}

/// Classifies a speed/ignition pair. Ignition off wins over any speed.
#[must_use]
pub fn movement_status(speed_kph: f64, ignition_on: bool) -> MovementStatus {
    if !ignition_on {
        return MovementStatus::Off;
    }
    if speed_kph > MOVING_SPEED_KPH { MovementStatus::Moving } else { MovementStatus::Idle }
}
