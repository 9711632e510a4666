//! Reference data loaders.
//!
//! Builds the [`FingerprintStore`] from the survey CSV and the
//! [`CoordinateTable`] from the location JSON.
//!
//! Survey CSV rows carry no header and have the layout
//!
//! ```text
//! id, location, ssid, mac, rssi
//! ```
//!
//! Rows with fewer than five columns, an empty MAC or location, or a
//! non-integer RSSI are skipped. A repeated `(mac, location)` pair replaces
//! the earlier reading.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::access_point::{AccessPointId, LocationId};
use crate::domain::coordinates::{CoordinateTable, Coordinates};
use crate::domain::fingerprint::{FingerprintStore, ReferenceReading};
use crate::error::LoadError;

const MIN_COLUMNS: usize = 5;
const COL_LOCATION: usize = 1;
const COL_SSID: usize = 2;
const COL_MAC: usize = 3;
const COL_RSSI: usize = 4;

/// Load the survey CSV at `path`.
pub fn load_fingerprints(path: impl AsRef<Path>) -> Result<FingerprintStore, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    info!("Loading WiFi fingerprint database from {}", path.display());
    let store = read_fingerprints(file)?;
    log_store_summary(&store);
    Ok(store)
}

/// Parse survey CSV rows from any reader.
pub fn read_fingerprints<R: Read>(reader: R) -> Result<FingerprintStore, LoadError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut builder = FingerprintStore::builder();
    let mut skipped = 0usize;
    for (line, record) in csv.records().enumerate() {
        let record = record?;
        if record.len() < MIN_COLUMNS {
            skipped += 1;
            continue;
        }

        let location = &record[COL_LOCATION];
        let mac = AccessPointId::new(&record[COL_MAC]);
        if mac.is_empty() || location.is_empty() {
            skipped += 1;
            continue;
        }

        let rssi = match record[COL_RSSI].parse::<i32>() {
            Ok(rssi) => rssi,
            Err(_) => {
                warn!(line = line + 1, value = &record[COL_RSSI], "skipping row with non-integer RSSI");
                skipped += 1;
                continue;
            }
        };

        if builder.insert(mac, ReferenceReading::new(location, rssi, &record[COL_SSID])) {
            debug!(line = line + 1, location, "duplicate reading replaced");
        }
    }

    debug!(readings = builder.reading_count(), skipped, "fingerprint rows parsed");
    Ok(builder.build())
}

fn log_store_summary(store: &FingerprintStore) {
    info!("Fingerprint database loaded: {} unique MAC addresses", store.len());
    for (location, count) in store.location_counts() {
        info!("  {location}: {count} MACs");
    }
}

/// Load the location JSON at `path` and install `unknown` as the sentinel.
///
/// The file is an object mapping location ids to `{"lat": .., "lng": ..}`.
/// An `UNKNOWN` key in the file is overridden by `unknown`.
pub fn load_coordinates(
    path: impl AsRef<Path>,
    unknown: Coordinates,
) -> Result<CoordinateTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let table = read_coordinates(file, unknown)?;
    info!("GPS coordinates loaded: {} locations", table.len());
    Ok(table)
}

/// Parse a location JSON object from any reader.
pub fn read_coordinates<R: Read>(
    reader: R,
    unknown: Coordinates,
) -> Result<CoordinateTable, LoadError> {
    let raw: HashMap<String, Coordinates> = serde_json::from_reader(reader)?;
    let mut table: CoordinateTable = raw
        .into_iter()
        .map(|(location, coords)| (LocationId::from(location), coords))
        .collect();
    table.insert(LocationId::unknown(), unknown);
    Ok(table)
}
