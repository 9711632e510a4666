//! Core value objects for access point identification and scan observations.
//!
//! These types form the shared kernel between the ingestion boundary, the
//! fingerprint store and the position estimator.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AccessPointId -- Value Object
// ---------------------------------------------------------------------------

/// A normalized access point hardware identifier (MAC / BSSID).
///
/// The identifier is trimmed and upper-cased on construction, so
/// `" aa:bb:cc:dd:ee:ff"` and `"AA:BB:CC:DD:EE:FF"` are the same key. It is
/// the join key between observations and the fingerprint store.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccessPointId(String);

impl AccessPointId {
    /// Normalize a raw identifier string.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// The normalized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for AccessPointId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for AccessPointId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<AccessPointId> for String {
    fn from(id: AccessPointId) -> Self {
        id.0
    }
}

impl fmt::Debug for AccessPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessPointId({})", self.0)
    }
}

impl fmt::Display for AccessPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// LocationId -- Value Object
// ---------------------------------------------------------------------------

/// Opaque name of a physical zone, e.g. a building or floor label.
///
/// Location identifiers carry no domain ordering; `Ord` is lexicographic and
/// only exists so that reports can be listed deterministically.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Reserved identifier of the fallback location used when nothing matches.
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The sentinel "unknown location" identifier.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LocationId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LocationId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Debug for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationId({})", self.0)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Observation -- Value Object
// ---------------------------------------------------------------------------

/// One access point seen in a single scan.
///
/// Field names on the wire follow the scanner firmware's JSON message
/// (`ssid`, `mac`, `rssi`, `channel`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// The SSID (network name). May be empty for hidden networks.
    #[serde(rename = "ssid")]
    pub network_name: String,
    /// The MAC address of the observed access point.
    #[serde(rename = "mac")]
    pub access_point_id: AccessPointId,
    /// Received signal strength in dBm (typically -30 to -90).
    #[serde(rename = "rssi")]
    pub signal_strength_dbm: i32,
    /// The 802.11 channel number.
    pub channel: i32,
}

impl Observation {
    pub fn new(
        network_name: impl Into<String>,
        access_point_id: impl Into<AccessPointId>,
        signal_strength_dbm: i32,
        channel: i32,
    ) -> Self {
        Self {
            network_name: network_name.into(),
            access_point_id: access_point_id.into(),
            signal_strength_dbm,
            channel,
        }
    }
}

// ---------------------------------------------------------------------------
// ObservationSet -- Value Object
// ---------------------------------------------------------------------------

/// All access points reported by one device in one scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSet {
    /// Identifier of the scanning device.
    pub device_id: String,
    /// Capture time reported by the device (seconds since its epoch).
    #[serde(rename = "timestamp")]
    pub captured_at_epoch: i64,
    /// Observed access points, in scan order.
    #[serde(rename = "networks")]
    pub observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(
        device_id: impl Into<String>,
        captured_at_epoch: i64,
        observations: Vec<Observation>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            captured_at_epoch,
            observations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_point_id_is_normalized() {
        let id = AccessPointId::new("  aa:bb:cc:dd:ee:0f ");
        assert_eq!(id.as_str(), "AA:BB:CC:DD:EE:0F");
        assert_eq!(id, AccessPointId::from("AA:BB:CC:DD:EE:0F"));
    }

    #[test]
    fn blank_access_point_id_is_empty() {
        assert!(AccessPointId::new("   ").is_empty());
    }

    #[test]
    fn location_unknown_sentinel() {
        assert!(LocationId::unknown().is_unknown());
        assert!(!LocationId::new("TOUR_56").is_unknown());
    }

    #[test]
    fn observation_set_wire_names() {
        let json = r#"{
            "device_id": "esp32-01",
            "timestamp": 1700000000,
            "networks": [
                {"ssid": "eduroam", "mac": "00:f6:63:ce:c6:54", "rssi": -65, "channel": 6}
            ]
        }"#;
        let set: ObservationSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.device_id, "esp32-01");
        assert_eq!(set.captured_at_epoch, 1_700_000_000);
        assert_eq!(set.observations.len(), 1);
        let obs = &set.observations[0];
        assert_eq!(obs.access_point_id.as_str(), "00:F6:63:CE:C6:54");
        assert_eq!(obs.signal_strength_dbm, -65);
        assert_eq!(obs.channel, 6);
    }
}
