//! Ingestion observability: one structured event per normalization attempt,
//! delivered to a caller-supplied sink. The core decides what to log, the
//! sink decides where it goes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{IngestError, Result};
use crate::normalize::{detect, normalize};
use crate::reading::GpsReading;
use crate::source::TelemetrySource;

/// Structured record of one ingestion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionEvent {
    /// Unique id for downstream correlation.
    pub id: String,

    /// UTC instant the attempt was recorded.
    pub logged_at: DateTime<Utc>,

    /// Vehicle identifier, when one could be extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,

    /// Detected source shape.
    pub source: TelemetrySource,

    /// Whether normalization produced a reading.
    pub success: bool,

    /// `"lat,lng"` coordinate string, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,

    /// Normalized speed in km/h, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kph: Option<f64>,

    /// Failure description, for unsuccessful attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestionEvent {
    /// Record for a successful attempt.
    #[must_use]
    pub fn success(reading: &GpsReading, source: TelemetrySource) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            logged_at: Utc::now(),
            vehicle_id: Some(reading.vehicle_id.clone()),
            source,
            success: true,
            coordinates: Some(format!(
                "{},{}",
                reading.position.latitude, reading.position.longitude
            )),
            speed_kph: Some(reading.speed_kph),
            error: None,
        }
    }

    /// Record for a failed attempt.
    #[must_use]
    pub fn failure(error: &IngestError) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            logged_at: Utc::now(),
            vehicle_id: None,
            source: error.source(),
            success: false,
            coordinates: None,
            speed_kph: None,
            error: Some(error.to_string()),
        }
    }
}

/// Caller-supplied destination for ingestion events.
pub trait IngestionSink {
    /// Accepts one event. Implementations must not fail the ingestion path.
    fn record(&self, event: &IngestionEvent);
}

/// Default sink emitting events as structured `tracing` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl IngestionSink for TracingSink {
    fn record(&self, event: &IngestionEvent) {
        if event.success {
            tracing::info!(
                id = %event.id,
                vehicle_id = event.vehicle_id.as_deref().unwrap_or("-"),
                source = %event.source,
                coordinates = event.coordinates.as_deref().unwrap_or("-"),
                speed_kph = event.speed_kph.unwrap_or(0.0),
                "telemetry normalized"
            );
        } else {
            tracing::warn!(
                id = %event.id,
                source = %event.source,
                error = event.error.as_deref().unwrap_or("-"),
                "telemetry rejected"
            );
        }
    }
}

/// Normalizer front door that records exactly one event per attempt.
#[derive(Debug, Clone, Default)]
pub struct Ingestor<S> {
    sink: S,
}

impl<S: IngestionSink> Ingestor<S> {
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Normalizes `payload`, recording the attempt with the sink either way.
    ///
    /// # Errors
    ///
    /// Returns the normalization failure untouched. The caller decides
    /// whether to drop, requeue or alert; nothing is retried here.
    pub fn ingest(&self, payload: &Value) -> Result<GpsReading> {
        let source = detect(payload);
        match normalize(payload) {
            Ok(reading) => {
                self.sink.record(&IngestionEvent::success(&reading, source));
                Ok(reading)
            }
            Err(err) => {
                self.sink.record(&IngestionEvent::failure(&err));
                Err(err)
            }
        }
    }
}
