//! # wifi-locator-core
//!
//! Domain layer for WiFi fingerprint positioning.
//!
//! This crate implements the **Fingerprint Positioning** bounded context:
//!
//! - **Domain types**: [`AccessPointId`], [`LocationId`], [`ObservationSet`],
//!   [`FingerprintStore`], [`CoordinateTable`], [`EstimationResult`]
//! - **Estimator**: [`PositionEstimator`] -- RSSI-difference voting over the
//!   fingerprint store
//! - **History**: [`ScanHistory`] -- single-writer, append-only result log
//! - **Loader**: CSV / JSON reference data loading
//!
//! ## Example
//!
//! ```rust
//! use wifi_locator_core::{
//!     AccessPointId, CoordinateTable, FingerprintStore, Observation, ObservationSet,
//!     PositionEstimator, ReferenceReading,
//! };
//!
//! let mut builder = FingerprintStore::builder();
//! builder.insert(
//!     AccessPointId::new("aa:aa:aa:aa:aa:aa"),
//!     ReferenceReading::new("LOC1", -60, "eduroam"),
//! );
//! let store = builder.build();
//! let coords = CoordinateTable::default();
//!
//! let scan = ObservationSet::new(
//!     "esp32-01",
//!     0,
//!     vec![Observation::new("eduroam", "AA:AA:AA:AA:AA:AA", -62, 6)],
//! );
//! let result = PositionEstimator::new().estimate(&scan, &store, &coords);
//! assert_eq!(result.location_id.as_str(), "LOC1");
//! assert_eq!(result.confidence, 80.0);
//! ```

#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod estimator;
pub mod history;
pub mod loader;

pub use domain::{
    AccessPointId, CoordinateTable, Coordinates, EstimationResult, FingerprintStore,
    FingerprintStoreBuilder, HistoryEntry, LocationId, Observation, ObservationSet,
    ReferenceReading,
};
pub use error::{HistoryError, LoadError};
pub use estimator::{
    estimate, EstimationReport, EstimatorConfig, LocationTally, MacVote, PositionEstimator,
};
pub use history::{HistoryReader, HistoryWriter, ScanHistory};
pub use loader::{load_coordinates, load_fingerprints};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
