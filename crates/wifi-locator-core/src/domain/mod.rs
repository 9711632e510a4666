//! Domain types for the fingerprint positioning bounded context.

pub mod access_point;
pub mod coordinates;
pub mod fingerprint;
pub mod result;

pub use access_point::{AccessPointId, LocationId, Observation, ObservationSet};
pub use coordinates::{CoordinateTable, Coordinates};
pub use fingerprint::{FingerprintStore, FingerprintStoreBuilder, ReferenceReading};
pub use result::{EstimationResult, HistoryEntry};
