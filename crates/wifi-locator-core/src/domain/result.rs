//! Position estimation outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::access_point::LocationId;
use crate::domain::coordinates::Coordinates;

/// The estimator's answer for one observation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Best-matching location, or `UNKNOWN` when nothing matched.
    #[serde(rename = "location")]
    pub location_id: LocationId,
    /// Dominance of the winner over the runner-up, in `[0, 100]`,
    /// rounded to one decimal place.
    pub confidence: f64,
    pub lat: f64,
    pub lng: f64,
}

impl EstimationResult {
    pub fn new(location_id: LocationId, confidence: f64, coords: Coordinates) -> Self {
        Self {
            location_id,
            confidence,
            lat: coords.lat,
            lng: coords.lng,
        }
    }

    /// The no-match answer: `UNKNOWN`, zero confidence, sentinel coordinates.
    pub fn unknown(sentinel: Coordinates) -> Self {
        Self::new(LocationId::unknown(), 0.0, sentinel)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// One processed scan as kept in the scan history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub device_id: String,
    /// Wall-clock time at which the scan was processed.
    #[serde(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: EstimationResult,
}

impl HistoryEntry {
    pub fn new(device_id: impl Into<String>, recorded_at: DateTime<Utc>, result: EstimationResult) -> Self {
        Self {
            device_id: device_id.into(),
            recorded_at,
            result,
        }
    }

    /// Stamp a result with the current time.
    pub fn now(device_id: impl Into<String>, result: EstimationResult) -> Self {
        Self::new(device_id, Utc::now(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn history_entry_json_shape() {
        let recorded_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let entry = HistoryEntry::new(
            "esp32-01",
            recorded_at,
            EstimationResult::new(LocationId::new("TOUR_56"), 72.5, Coordinates::new(48.8, 2.3)),
        );

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["device_id"], "esp32-01");
        assert_eq!(value["location"], "TOUR_56");
        assert_eq!(value["confidence"], 72.5);
        assert_eq!(value["lat"], 48.8);
        assert_eq!(value["lng"], 2.3);
        assert_eq!(value["timestamp"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn unknown_result_uses_sentinel() {
        let result = EstimationResult::unknown(Coordinates::new(1.0, 2.0));
        assert!(result.location_id.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.coordinates(), Coordinates::new(1.0, 2.0));
    }
}
