//! # Fleet Core
//!
//! GPS ingestion and route optimization for the fleet platform: a pure
//! geospatial kernel, a format-detecting telemetry normalizer and a
//! heuristic stop-sequence optimizer. Consumed in-process by the
//! application layer; persistence, transport and alert delivery live
//! elsewhere.

pub use geo;
pub use ingest;
pub use routing;

use ingest::{GpsReading, Result};
use routing::{OptimizeOptions, OrderedStop, Stop};
use serde_json::Value;

/// Normalizes one raw tracker payload into a canonical reading.
///
/// # Errors
///
/// Returns a typed [`ingest::IngestError`] when the payload is not a JSON
/// object or fails the matched vendor shape's validation. The raw payload
/// travels with the error for diagnostics; nothing is dropped silently.
pub fn normalize_telemetry(payload: &Value) -> Result<GpsReading> {
    ingest::normalize(payload)
}

/// Orders the stops of a trip for visiting.
///
/// Greedy nearest-neighbour sequencing, with 2-opt refinement when
/// `options.refine` is set. Pure: callers persist the returned order and
/// may re-invoke whenever stops are edited.
#[must_use]
pub fn optimize_stops(stops: &[Stop], options: &OptimizeOptions) -> Vec<OrderedStop> {
    routing::optimize(stops, options)
}
