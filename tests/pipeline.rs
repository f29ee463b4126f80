#![allow(missing_docs)]

use fleet::{normalize_telemetry, optimize_stops};
use geo::{CompassDirection, GeoPoint, MovementStatus, compass_direction, movement_status};
use ingest::GpsReading;
use pretty_assertions::assert_eq;
use routing::{OptimizeOptions, Stop, StopKind};
use serde_json::json;

// Raw payloads from three different sources flow through normalization,
// the kernel's classifiers, and finally stop sequencing.
#[test]
fn ingest_to_route_pipeline() {
    let payloads = [
        json!({
            "vehicle": {"id": "truck-1"},
            "location": {"lat": -36.85, "lng": 174.76},
            "speed": 30,
            "fuelLevel": 80,
            "ignitionOn": true
        }),
        json!({
            "topic": "fleet/truck-1/gps",
            "payload": {"lat": -36.91, "lng": 174.66, "speed": 0}
        }),
        json!({"truckId": "truck-1", "lat": -36.99, "lng": 174.88, "speed": 12.0, "ignitionOn": true}),
    ];

    let readings: Vec<GpsReading> = payloads
        .iter()
        .map(|payload| normalize_telemetry(payload).expect("payload should normalize"))
        .collect();

    assert!(readings.iter().all(GpsReading::is_valid));
    assert_eq!(
        movement_status(readings[0].speed_kph, readings[0].ignition_on),
        MovementStatus::Moving
    );
    assert_eq!(
        movement_status(readings[1].speed_kph, readings[1].ignition_on),
        MovementStatus::Off
    );

    let stops: Vec<Stop> = readings
        .iter()
        .enumerate()
        .map(|(index, reading)| Stop {
            kind: if index == 0 { StopKind::Pickup } else { StopKind::Dropoff },
            address: format!("stop {index}"),
            position: reading.position,
            notes: None,
        })
        .collect();

    let route = optimize_stops(&stops, &OptimizeOptions { refine: true, max_refine_passes: None });

    assert_eq!(route.len(), 3);
    // the truck is already at the first stop
    assert_eq!(route[0].stop.address, "stop 0");

    let mut sequences: Vec<u32> = route.iter().map(|entry| entry.sequence).collect();
    sequences.sort_unstable();
    assert_eq!(sequences, vec![1, 2, 3]);
}

// Dispatcher annotations derived from the kernel alone.
#[test]
fn dispatcher_annotations() {
    let depot = GeoPoint::new(-36.8485, 174.7633);
    let dropoff = GeoPoint::new(-36.73, 174.70);

    let bearing = depot.bearing_deg(dropoff);
    assert_eq!(compass_direction(bearing), CompassDirection::NW);

    assert!(dropoff.within_geofence(depot, 20.0));
    assert!(!dropoff.within_geofence(depot, 5.0));

    let minutes = geo::eta_minutes(depot.distance_km(dropoff));
    assert!((10..=20).contains(&minutes));
}
