//! Structural payload detection and per-vendor normalization.
//!
//! Vendors do not agree on a common envelope, so detection is duck-typed:
//! an ordered chain of shape predicates, first match wins. The order is a
//! compatibility contract: malformed payloads can satisfy more than one
//! predicate, and changing the order changes which parser sees them.

use chrono::{DateTime, Utc};
use geo::{GeoPoint, is_valid_point, mph_to_kmh, normalize_heading};
use serde_json::{Map, Value};

use crate::error::{IngestError, Result};
use crate::reading::GpsReading;
use crate::source::TelemetrySource;

type Fields = Map<String, Value>;

/// Normalizes one raw tracker payload into a canonical [`GpsReading`].
///
/// # Errors
///
/// Returns [`IngestError::UnknownFormat`] when the payload is not a JSON
/// object, and a vendor-tagged validation error when the matched shape is
/// missing its identifier or a usable coordinate pair.
pub fn normalize(payload: &Value) -> Result<GpsReading> {
    let Some(fields) = payload.as_object() else {
        return Err(IngestError::UnknownFormat {
            detail: "payload is not a JSON object".to_string(),
            payload: payload.clone(),
        });
    };

    match detect(payload) {
        TelemetrySource::VendorA => vendor_a(fields, payload),
        TelemetrySource::VendorB => vendor_b(fields, payload),
        TelemetrySource::VendorC => vendor_c(fields, payload),
        TelemetrySource::Bus => bus(fields, payload),
        TelemetrySource::Native | TelemetrySource::Unknown => native(fields, payload),
    }
}

/// Detects the vendor shape of a payload without normalizing it.
#[must_use]
pub fn detect(payload: &Value) -> TelemetrySource {
    let Some(fields) = payload.as_object() else {
        return TelemetrySource::Unknown;
    };

    if fields.get("vehicle").is_some_and(Value::is_object)
        && fields.get("location").is_some_and(Value::is_object)
    {
        TelemetrySource::VendorA
    } else if fields.get("device").is_some_and(Value::is_object)
        && (fields.contains_key("latitude") || fields.contains_key("lat"))
    {
        TelemetrySource::VendorB
    } else if fields.contains_key("asset_id") && fields.get("gps").is_some_and(Value::is_object) {
        TelemetrySource::VendorC
    } else if fields.get("topic").is_some_and(Value::is_string)
        && fields.get("payload").is_some_and(Value::is_object)
    {
        TelemetrySource::Bus
    } else {
        TelemetrySource::Native
    }
}

// Vendor A envelope: `vehicle`/`location` objects, speeds in mph.
fn vendor_a(fields: &Fields, raw: &Value) -> Result<GpsReading> {
    const SOURCE: TelemetrySource = TelemetrySource::VendorA;

    let vehicle_id = ident(object(fields, "vehicle").and_then(|v| v.get("id"))).ok_or_else(
        || IngestError::MissingId { source: SOURCE, field: "vehicle.id", payload: raw.clone() },
    )?;

    let location = object(fields, "location");
    let position = coordinates(
        SOURCE,
        numeric(location.and_then(|l| l.get("lat"))),
        numeric(location.and_then(|l| l.get("lng"))),
        raw,
    )?;

    let speed_kph = clamp_speed(numeric(fields.get("speed")).map(mph_to_kmh));

    Ok(GpsReading {
        vehicle_id,
        position,
        speed_kph,
        heading_deg: heading(numeric(fields.get("heading"))),
        fuel_level_pct: clamp_fuel(numeric(fields.get("fuelLevel"))),
        ignition_on: boolean(fields.get("ignitionOn")).unwrap_or(speed_kph > 0.0),
        observed_at: observed_at(SOURCE, fields.get("timestamp"), raw)?,
    })
}

// Vendor B envelope: `device` object with top-level coordinates, metric
// units natively. Coordinate keys vary by firmware revision.
fn vendor_b(fields: &Fields, raw: &Value) -> Result<GpsReading> {
    const SOURCE: TelemetrySource = TelemetrySource::VendorB;

    let vehicle_id = ident(object(fields, "device").and_then(|d| d.get("id"))).ok_or_else(
        || IngestError::MissingId { source: SOURCE, field: "device.id", payload: raw.clone() },
    )?;

    let position = coordinates(
        SOURCE,
        numeric(first(fields, &["latitude", "lat"])),
        numeric(first(fields, &["longitude", "lng", "lon"])),
        raw,
    )?;

    let speed_kph = clamp_speed(numeric(fields.get("speed")));

    Ok(GpsReading {
        vehicle_id,
        position,
        speed_kph,
        heading_deg: heading(numeric(fields.get("bearing"))),
        fuel_level_pct: clamp_fuel(numeric(fields.get("fuel"))),
        ignition_on: boolean(fields.get("ignition")).unwrap_or(speed_kph > 0.0),
        observed_at: observed_at(SOURCE, fields.get("dateTime"), raw)?,
    })
}

// Vendor C envelope: flat `asset_id` plus a `gps` block, speeds in mph.
fn vendor_c(fields: &Fields, raw: &Value) -> Result<GpsReading> {
    const SOURCE: TelemetrySource = TelemetrySource::VendorC;

    let vehicle_id = ident(fields.get("asset_id")).ok_or_else(|| IngestError::MissingId {
        source: SOURCE,
        field: "asset_id",
        payload: raw.clone(),
    })?;

    let gps = object(fields, "gps");
    let position = coordinates(
        SOURCE,
        numeric(gps.and_then(|g| g.get("lat"))),
        numeric(gps.and_then(|g| g.get("lon"))),
        raw,
    )?;

    let speed_kph = clamp_speed(numeric(fields.get("speed")).map(mph_to_kmh));

    // ignition_status is the literal string "on", a boolean, or absent;
    // a moving vehicle is taken to have its engine running either way.
    let ignition_on = match fields.get("ignition_status") {
        Some(Value::String(s)) if s == "on" => true,
        Some(Value::Bool(true)) => true,
        _ => speed_kph > 0.0,
    };

    Ok(GpsReading {
        vehicle_id,
        position,
        speed_kph,
        heading_deg: heading(numeric(fields.get("heading"))),
        fuel_level_pct: clamp_fuel(numeric(fields.get("fuel_percent"))),
        ignition_on,
        observed_at: observed_at(SOURCE, fields.get("event_time"), raw)?,
    })
}

// Message-bus envelope: `fleet/{vehicleId}/gps` topic wrapping an inner
// payload whose field names vary by producer.
fn bus(fields: &Fields, raw: &Value) -> Result<GpsReading> {
    const SOURCE: TelemetrySource = TelemetrySource::Bus;

    let topic = fields.get("topic").and_then(Value::as_str).unwrap_or_default();
    let vehicle_id = topic
        .split('/')
        .nth(1)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| IngestError::MissingId {
            source: SOURCE,
            field: "topic",
            payload: raw.clone(),
        })?;

    let inner = object(fields, "payload");
    let position = coordinates(
        SOURCE,
        numeric(inner.and_then(|p| first(p, &["lat", "latitude"]))),
        numeric(inner.and_then(|p| first(p, &["lng", "longitude"]))),
        raw,
    )?;

    let speed_kph = clamp_speed(numeric(inner.and_then(|p| p.get("speed"))));

    Ok(GpsReading {
        vehicle_id,
        position,
        speed_kph,
        heading_deg: heading(numeric(inner.and_then(|p| p.get("heading")))),
        fuel_level_pct: clamp_fuel(numeric(inner.and_then(|p| first(p, &["fuel", "fuelLevel"])))),
        ignition_on: boolean(inner.and_then(|p| first(p, &["ignition", "ignitionOn"])))
            .unwrap_or(speed_kph > 0.0),
        observed_at: observed_at(SOURCE, inner.and_then(|p| p.get("timestamp")), raw)?,
    })
}

// Canonical shape emitted by our own clients; speed already km/h.
fn native(fields: &Fields, raw: &Value) -> Result<GpsReading> {
    const SOURCE: TelemetrySource = TelemetrySource::Native;

    let vehicle_id = ident(fields.get("truckId")).ok_or_else(|| IngestError::MissingId {
        source: SOURCE,
        field: "truckId",
        payload: raw.clone(),
    })?;

    let position =
        coordinates(SOURCE, numeric(fields.get("lat")), numeric(fields.get("lng")), raw)?;

    let speed_kph = clamp_speed(numeric(fields.get("speed")));

    Ok(GpsReading {
        vehicle_id,
        position,
        speed_kph,
        heading_deg: heading(numeric(fields.get("heading"))),
        fuel_level_pct: clamp_fuel(numeric(fields.get("fuelLevel"))),
        ignition_on: boolean(fields.get("ignitionOn")).unwrap_or(speed_kph > 0.0),
        observed_at: observed_at(SOURCE, fields.get("timestamp"), raw)?,
    })
}

fn object<'a>(fields: &'a Fields, key: &str) -> Option<&'a Fields> {
    fields.get(key).and_then(Value::as_object)
}

// First PRESENT key wins, even if its value later fails the numeric check;
// mirrors the coalescing the producing integrations rely on.
fn first<'a>(fields: &'a Fields, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| fields.get(*key))
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn boolean(value: Option<&Value>) -> Option<bool> {
    value.and_then(Value::as_bool)
}

// Identifiers arrive as strings or bare integers depending on firmware.
fn ident(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coordinates(
    source: TelemetrySource, latitude: Option<f64>, longitude: Option<f64>, raw: &Value,
) -> Result<GeoPoint> {
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Err(IngestError::MissingCoordinates { source, payload: raw.clone() });
    };

    if !is_valid_point(latitude, longitude) {
        return Err(IngestError::InvalidCoordinates {
            source,
            latitude,
            longitude,
            payload: raw.clone(),
        });
    }

    Ok(GeoPoint::new(latitude, longitude))
}

fn clamp_speed(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).map_or(0.0, |v| v.max(0.0))
}

fn clamp_fuel(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).map_or(0.0, |v| v.clamp(0.0, 100.0))
}

fn heading(value: Option<f64>) -> f64 {
    normalize_heading(value.unwrap_or(0.0))
}

fn observed_at(
    source: TelemetrySource, value: Option<&Value>, raw: &Value,
) -> Result<DateTime<Utc>> {
    let Some(value) = value else {
        return Ok(Utc::now());
    };

    match value {
        Value::Null => Ok(Utc::now()),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|err| IngestError::InvalidTimestamp {
                source,
                detail: format!("{text}: {err}"),
                payload: raw.clone(),
            }),
        Value::Number(epoch) => epoch
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| IngestError::InvalidTimestamp {
                source,
                detail: format!("epoch milliseconds out of range: {epoch}"),
                payload: raw.clone(),
            }),
        other => Err(IngestError::InvalidTimestamp {
            source,
            detail: format!("unsupported time field: {other}"),
            payload: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn detection_order_is_fixed() {
        assert_eq!(
            detect(&json!({"vehicle": {}, "location": {}})),
            TelemetrySource::VendorA
        );
        assert_eq!(detect(&json!({"device": {}, "lat": 1.0})), TelemetrySource::VendorB);
        assert_eq!(detect(&json!({"asset_id": "a1", "gps": {}})), TelemetrySource::VendorC);
        assert_eq!(
            detect(&json!({"topic": "fleet/t1/gps", "payload": {}})),
            TelemetrySource::Bus
        );
        assert_eq!(detect(&json!({"truckId": "t1"})), TelemetrySource::Native);
        assert_eq!(detect(&json!("just a string")), TelemetrySource::Unknown);
    }

    // A payload satisfying both the vendorA and vendorB predicates must be
    // parsed as vendorA.
    #[test]
    fn ambiguous_payload_takes_first_match() {
        let payload = json!({
            "vehicle": {"id": "v1"},
            "location": {"lat": 1.0, "lng": 2.0},
            "device": {"id": "d1"},
            "lat": 9.0
        });

        assert_eq!(detect(&payload), TelemetrySource::VendorA);
        let reading = normalize(&payload).expect("should normalize");
        assert_eq!(reading.vehicle_id, "v1");
        assert_eq!(reading.position.latitude, 1.0);
    }

    #[test]
    fn device_without_coordinate_key_falls_through() {
        // no latitude/lat at top level, so the vendorB predicate fails and
        // the payload reaches the native fallback
        let payload = json!({"device": {"id": "d1"}, "truckId": "t9", "lat2": 0.0});
        assert_eq!(detect(&payload), TelemetrySource::Native);
    }

    #[test]
    fn ident_accepts_strings_and_integers() {
        assert_eq!(ident(Some(&json!("truck-1"))), Some("truck-1".to_string()));
        assert_eq!(ident(Some(&json!("  padded "))), Some("padded".to_string()));
        assert_eq!(ident(Some(&json!(4502))), Some("4502".to_string()));
        assert_eq!(ident(Some(&json!(""))), None);
        assert_eq!(ident(Some(&json!("   "))), None);
        assert_eq!(ident(Some(&json!(true))), None);
        assert_eq!(ident(None), None);
    }

    #[test]
    fn first_prefers_earlier_keys() {
        let fields =
            json!({"lng": 5.0, "lon": 6.0}).as_object().cloned().expect("object literal");
        assert_eq!(numeric(first(&fields, &["longitude", "lng", "lon"])), Some(5.0));
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_speed(Some(-3.0)), 0.0);
        assert_eq!(clamp_speed(Some(f64::NAN)), 0.0);
        assert_eq!(clamp_speed(None), 0.0);
        assert_eq!(clamp_fuel(Some(120.0)), 100.0);
        assert_eq!(clamp_fuel(Some(-1.0)), 0.0);
        assert_eq!(heading(Some(-90.0)), 270.0);
        assert_eq!(heading(None), 0.0);
    }

    #[test]
    fn timestamp_resolution() {
        let raw = json!({});
        let source = TelemetrySource::Native;

        let parsed = observed_at(source, Some(&json!("2026-08-05T10:15:00Z")), &raw)
            .expect("rfc3339 should parse");
        assert_eq!(parsed.timestamp(), 1_785_924_900);

        let epoch = observed_at(source, Some(&json!(1_700_000_000_000_i64)), &raw)
            .expect("epoch millis should parse");
        assert_eq!(epoch.timestamp(), 1_700_000_000);

        let err = observed_at(source, Some(&json!("next tuesday")), &raw)
            .expect_err("should reject junk");
        assert_eq!(err.code(), "invalid_timestamp");

        assert!(observed_at(source, Some(&Value::Null), &raw).is_ok());
        assert!(observed_at(source, None, &raw).is_ok());
    }
}
