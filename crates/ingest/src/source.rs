use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin shape detected for an inbound payload.
///
/// The serialized tags are a compatibility contract with the operational
/// tooling that reconstructs ingestion health from event streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetrySource {
    /// Vendor A tracker: `vehicle`/`location` envelope, speeds in mph.
    #[serde(rename = "vendorA")]
    VendorA,

    /// Vendor B tracker: `device` envelope, metric units.
    #[serde(rename = "vendorB")]
    VendorB,

    /// Vendor C tracker: `asset_id` plus `gps` block, speeds in mph.
    #[serde(rename = "vendorC")]
    VendorC,

    /// Message-bus envelope with a `fleet/{vehicleId}/gps` topic.
    #[serde(rename = "bus")]
    Bus,

    /// Canonical shape emitted by our own clients.
    #[serde(rename = "native")]
    Native,

    /// No recognisable shape.
    #[serde(rename = "unknown")]
    Unknown,
}

impl TelemetrySource {
    /// Stable wire tag used in logs and error reports.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::VendorA => "vendorA",
            Self::VendorB => "vendorB",
            Self::VendorC => "vendorC",
            Self::Bus => "bus",
            Self::Native => "native",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TelemetrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::error::Error for TelemetrySource {}
