//! Shared state handed to every API handler.

use std::sync::Arc;
use std::time::Instant;

use wifi_locator_core::{CoordinateTable, FingerprintStore, HistoryReader};

use crate::ingest::IngestHandle;

/// Read-only projections of the process state plus the ingest queue.
///
/// Cloned per request; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<FingerprintStore>,
    coords: Arc<CoordinateTable>,
    history: HistoryReader,
    ingest: IngestHandle,
    start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<FingerprintStore>,
        coords: Arc<CoordinateTable>,
        history: HistoryReader,
        ingest: IngestHandle,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                coords,
                history,
                ingest,
                start_time: Instant::now(),
            }),
        }
    }

    pub fn store(&self) -> &FingerprintStore {
        &self.inner.store
    }

    pub fn coords(&self) -> &CoordinateTable {
        &self.inner.coords
    }

    pub fn history(&self) -> &HistoryReader {
        &self.inner.history
    }

    pub fn ingest(&self) -> &IngestHandle {
        &self.inner.ingest
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }
}
