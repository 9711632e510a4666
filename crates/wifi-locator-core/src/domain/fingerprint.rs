//! Fingerprint store aggregate.
//!
//! The `FingerprintStore` records, for every known access point, the signal
//! strength expected at each surveyed location. It is assembled once through
//! [`FingerprintStoreBuilder`] and is read-only afterwards, so it can be
//! shared between tasks behind an `Arc` without locking.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::access_point::{AccessPointId, LocationId};

// ---------------------------------------------------------------------------
// ReferenceReading -- Value Object
// ---------------------------------------------------------------------------

/// One surveyed (location, access point) pairing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceReading {
    /// Location at which the reading was taken.
    pub location_id: LocationId,
    /// Expected signal strength in dBm at that location.
    pub signal_strength_dbm: i32,
    /// SSID broadcast by the access point during the survey.
    pub network_name: String,
}

impl ReferenceReading {
    pub fn new(
        location_id: impl Into<LocationId>,
        signal_strength_dbm: i32,
        network_name: impl Into<String>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            signal_strength_dbm,
            network_name: network_name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// FingerprintStore -- Aggregate Root
// ---------------------------------------------------------------------------

/// Immutable mapping `AccessPointId -> LocationId -> ReferenceReading`.
///
/// Invariants:
/// - every access point has at least one reading;
/// - readings for one access point have distinct locations and keep the
///   order in which they were first registered.
#[derive(Debug, Clone, Default)]
pub struct FingerprintStore {
    entries: HashMap<AccessPointId, Vec<ReferenceReading>>,
}

impl FingerprintStore {
    pub fn builder() -> FingerprintStoreBuilder {
        FingerprintStoreBuilder::default()
    }

    /// Readings registered for an access point, in registration order.
    ///
    /// Returns `None` when the access point was never surveyed; a returned
    /// slice is never empty.
    pub fn readings(&self, id: &AccessPointId) -> Option<&[ReferenceReading]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &AccessPointId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of distinct access points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of access points surveyed at each location.
    pub fn location_counts(&self) -> BTreeMap<LocationId, usize> {
        let mut counts = BTreeMap::new();
        for readings in self.entries.values() {
            for reading in readings {
                *counts
                    .entry(reading.location_id.clone())
                    .or_insert(0usize) += 1;
            }
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// FingerprintStoreBuilder
// ---------------------------------------------------------------------------

/// Mutable accumulator used by loaders to assemble a [`FingerprintStore`].
#[derive(Debug, Default)]
pub struct FingerprintStoreBuilder {
    entries: HashMap<AccessPointId, Vec<ReferenceReading>>,
    readings: usize,
}

impl FingerprintStoreBuilder {
    /// Register a reading for an access point.
    ///
    /// A reading for a location that is already registered for this access
    /// point replaces the earlier one in place. Returns `true` if a reading
    /// was replaced.
    pub fn insert(&mut self, id: AccessPointId, reading: ReferenceReading) -> bool {
        let readings = self.entries.entry(id).or_default();
        match readings
            .iter_mut()
            .find(|r| r.location_id == reading.location_id)
        {
            Some(existing) => {
                *existing = reading;
                true
            }
            None => {
                readings.push(reading);
                self.readings += 1;
                false
            }
        }
    }

    /// Number of distinct (access point, location) pairs registered so far.
    pub fn reading_count(&self) -> usize {
        self.readings
    }

    pub fn build(self) -> FingerprintStore {
        FingerprintStore {
            entries: self.entries,
        }
    }
}
