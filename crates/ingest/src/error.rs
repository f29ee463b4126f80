//! Ingestion error types.

use serde_json::Value;
use thiserror::Error;

use crate::source::TelemetrySource;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Failure raised while normalizing a tracker payload.
///
/// Every variant carries the detected source tag and the raw offending
/// payload so a single bad message can be replayed offline.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The payload is not a JSON object at all.
    #[error("unknown telemetry format: {detail}")]
    UnknownFormat {
        detail: String,
        payload: Value,
    },

    /// The required vehicle/device/asset identifier is missing or empty.
    #[error("{source} payload has no usable {field} identifier")]
    MissingId {
        source: TelemetrySource,
        field: &'static str,
        payload: Value,
    },

    /// The required coordinate pair is absent or non-numeric.
    #[error("{source} payload has no numeric coordinate pair")]
    MissingCoordinates {
        source: TelemetrySource,
        payload: Value,
    },

    /// The coordinate pair is numeric but outside WGS-84 range.
    #[error("{source} payload has out-of-range coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        source: TelemetrySource,
        latitude: f64,
        longitude: f64,
        payload: Value,
    },

    /// The payload's time field is present but not a usable instant.
    #[error("{source} payload has an unreadable timestamp: {detail}")]
    InvalidTimestamp {
        source: TelemetrySource,
        detail: String,
        payload: Value,
    },
}

impl IngestError {
    /// Stable error code associated with the variant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownFormat { .. } => "unknown_format",
            Self::MissingId { .. } => "missing_id",
            Self::MissingCoordinates { .. } => "missing_coordinates",
            Self::InvalidCoordinates { .. } => "invalid_coordinates",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
        }
    }

    /// Source shape the payload was detected as.
    #[must_use]
    pub const fn source(&self) -> TelemetrySource {
        match self {
            Self::UnknownFormat { .. } => TelemetrySource::Unknown,
            Self::MissingId { source, .. }
            | Self::MissingCoordinates { source, .. }
            | Self::InvalidCoordinates { source, .. }
            | Self::InvalidTimestamp { source, .. } => *source,
        }
    }

    /// Raw offending payload, kept verbatim for diagnostics and replay.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        match self {
            Self::UnknownFormat { payload, .. }
            | Self::MissingId { payload, .. }
            | Self::MissingCoordinates { payload, .. }
            | Self::InvalidCoordinates { payload, .. }
            | Self::InvalidTimestamp { payload, .. } => payload,
        }
    }
}
