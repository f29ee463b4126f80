use geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Role of a stop within a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Dropoff,
}

/// A trip stop awaiting sequencing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Whether goods are collected or delivered here.
    pub kind: StopKind,

    /// Display address. Carried through unchanged, never interpreted.
    pub address: String,

    /// Coordinates used for distance computation.
    pub position: GeoPoint,

    /// Free-form driver notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A stop with its assigned visiting order.
///
/// Sequences are unique and contiguous from 1 within a single optimization
/// run. The trip-scheduling layer persists these; the optimizer keeps
/// nothing beyond the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedStop {
    #[serde(flatten)]
    pub stop: Stop,

    /// 1-based visiting position.
    pub sequence: u32,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn ordered_stop_flattens_over_the_stop() {
        let ordered = OrderedStop {
            stop: Stop {
                kind: StopKind::Pickup,
                address: "12 Wharf Rd".to_string(),
                position: GeoPoint::new(-36.8, 174.7),
                notes: None,
            },
            sequence: 3,
        };

        let value = serde_json::to_value(&ordered).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "kind": "pickup",
                "address": "12 Wharf Rd",
                "position": {"latitude": -36.8, "longitude": 174.7},
                "sequence": 3
            })
        );
    }
}
