//! Geographic coordinates of surveyed locations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::access_point::LocationId;

/// WGS84 latitude / longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Read-only mapping `LocationId -> Coordinates` with a mandatory fallback.
///
/// The sentinel entry is stored apart from the surveyed locations, which
/// guarantees there is exactly one of it. Inserting the reserved `UNKNOWN`
/// key replaces the sentinel rather than adding a second entry.
#[derive(Debug, Clone)]
pub struct CoordinateTable {
    locations: HashMap<LocationId, Coordinates>,
    unknown: Coordinates,
}

impl CoordinateTable {
    /// Fallback coordinates used when no sentinel is configured.
    pub const DEFAULT_UNKNOWN: Coordinates = Coordinates::new(48.8466, 2.3571);

    /// Create an empty table whose only entry is the sentinel.
    pub fn new(unknown: Coordinates) -> Self {
        Self {
            locations: HashMap::new(),
            unknown,
        }
    }

    pub fn insert(&mut self, location: LocationId, coords: Coordinates) {
        if location.is_unknown() {
            self.unknown = coords;
        } else {
            self.locations.insert(location, coords);
        }
    }

    /// Coordinates of a location, including the sentinel under `UNKNOWN`.
    pub fn get(&self, location: &str) -> Option<Coordinates> {
        if location == LocationId::UNKNOWN {
            Some(self.unknown)
        } else {
            self.locations.get(location).copied()
        }
    }

    /// Coordinates of a location, falling back to the sentinel.
    pub fn resolve(&self, location: &str) -> Coordinates {
        self.get(location).unwrap_or(self.unknown)
    }

    pub fn unknown(&self) -> Coordinates {
        self.unknown
    }

    /// All location ids, sorted, with the sentinel last.
    pub fn location_ids(&self) -> Vec<LocationId> {
        let mut ids: Vec<LocationId> = self.locations.keys().cloned().collect();
        ids.sort();
        ids.push(LocationId::unknown());
        ids
    }

    /// Number of entries, counting the sentinel.
    pub fn len(&self) -> usize {
        self.locations.len() + 1
    }

    /// A table always holds the sentinel, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for CoordinateTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_UNKNOWN)
    }
}

impl FromIterator<(LocationId, Coordinates)> for CoordinateTable {
    fn from_iter<I: IntoIterator<Item = (LocationId, Coordinates)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (location, coords) in iter {
            table.insert(location, coords);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_always_present() {
        let table = CoordinateTable::default();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("UNKNOWN"), Some(CoordinateTable::DEFAULT_UNKNOWN));
        assert_eq!(table.location_ids(), vec![LocationId::unknown()]);
    }

    #[test]
    fn inserting_unknown_replaces_sentinel() {
        let mut table = CoordinateTable::default();
        table.insert(LocationId::unknown(), Coordinates::new(1.0, 2.0));
        assert_eq!(table.len(), 1);
        assert_eq!(table.unknown(), Coordinates::new(1.0, 2.0));
    }

    #[test]
    fn resolve_falls_back_to_sentinel() {
        let table: CoordinateTable = [(
            LocationId::new("TOUR_56"),
            Coordinates::new(48.845813, 2.356219),
        )]
        .into_iter()
        .collect();

        assert_eq!(table.resolve("TOUR_56"), Coordinates::new(48.845813, 2.356219));
        assert_eq!(table.resolve("NOWHERE"), CoordinateTable::DEFAULT_UNKNOWN);
    }

    #[test]
    fn location_ids_sorted_with_sentinel_last() {
        let table: CoordinateTable = [
            (LocationId::new("TOUR_56"), Coordinates::new(0.0, 0.0)),
            (LocationId::new("ESC"), Coordinates::new(0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        let ids: Vec<String> = table.location_ids().iter().map(|l| l.to_string()).collect();
        assert_eq!(ids, vec!["ESC", "TOUR_56", "UNKNOWN"]);
    }
}
