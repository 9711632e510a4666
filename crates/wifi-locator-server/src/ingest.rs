//! Scan ingestion: validation boundary and the single-writer worker.
//!
//! Transports (UDP datagrams, HTTP `POST /api/scans`) turn raw payloads into
//! [`ObservationSet`]s with [`parse_scan`] and hand them to an
//! [`IngestHandle`]. A single [`IngestWorker`] task drains the queue, runs the
//! position estimator and appends to the scan history. It owns the only
//! [`HistoryWriter`], so the history has exactly one writer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use wifi_locator_core::{
    CoordinateTable, FingerprintStore, HistoryEntry, HistoryWriter, ObservationSet,
    PositionEstimator,
};

/// Errors raised on the ingestion path.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload is not a valid scan message.
    #[error("malformed scan message: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Estimation failed unexpectedly for one scan.
    #[error("processing fault for device '{device_id}': {reason}")]
    ProcessingFault { device_id: String, reason: String },

    /// The worker has shut down and no longer accepts scans.
    #[error("ingestion worker is not running")]
    WorkerClosed,
}

/// Decode one JSON scan message.
///
/// Expected shape:
/// `{"device_id": str, "timestamp": int, "networks": [{"ssid", "mac", "rssi", "channel"}]}`.
pub fn parse_scan(payload: &[u8]) -> Result<ObservationSet, IngestError> {
    Ok(serde_json::from_slice(payload)?)
}

// ── Handle ───────────────────────────────────────────────────────────────────

/// Cloneable submission handle for transports.
#[derive(Debug, Clone)]
pub struct IngestHandle {
    tx: mpsc::Sender<ObservationSet>,
}

impl IngestHandle {
    /// Queue a validated scan, waiting if the queue is full.
    pub async fn submit(&self, scan: ObservationSet) -> Result<(), IngestError> {
        self.tx.send(scan).await.map_err(|_| IngestError::WorkerClosed)
    }

    /// Validate a raw payload and queue it.
    pub async fn submit_raw(&self, payload: &[u8]) -> Result<(), IngestError> {
        let scan = parse_scan(payload)?;
        self.submit(scan).await
    }
}

// ── Worker ───────────────────────────────────────────────────────────────────

/// The single consumer of ingested scans.
pub struct IngestWorker {
    store: Arc<FingerprintStore>,
    coords: Arc<CoordinateTable>,
    estimator: PositionEstimator,
    history: HistoryWriter,
    rx: mpsc::Receiver<ObservationSet>,
}

impl IngestWorker {
    /// Create a worker and the handle that feeds it.
    ///
    /// `capacity` bounds the number of scans waiting to be processed.
    pub fn new(
        store: Arc<FingerprintStore>,
        coords: Arc<CoordinateTable>,
        estimator: PositionEstimator,
        history: HistoryWriter,
        capacity: usize,
    ) -> (Self, IngestHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = Self {
            store,
            coords,
            estimator,
            history,
            rx,
        };
        (worker, IngestHandle { tx })
    }

    /// Estimate one scan and record it.
    ///
    /// A panic inside the estimator is contained to this scan: it is
    /// reported as [`IngestError::ProcessingFault`] and nothing is appended.
    pub fn process(&mut self, scan: ObservationSet) -> Result<HistoryEntry, IngestError> {
        let (estimator, store, coords) = (&self.estimator, &*self.store, &*self.coords);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            estimator.estimate_detailed(&scan, store, coords)
        }));

        let report = outcome.map_err(|payload| IngestError::ProcessingFault {
            device_id: scan.device_id.clone(),
            reason: panic_message(payload.as_ref()),
        })?;

        info!(
            device = %scan.device_id,
            location = %report.result.location_id,
            confidence = report.result.confidence,
            lat = report.result.lat,
            lng = report.result.lng,
            matched = report.matched,
            observed = scan.observations.len(),
            "position estimated"
        );

        let entry = HistoryEntry::now(scan.device_id, report.result);
        self.history.append(entry.clone());
        Ok(entry)
    }

    /// Drain the queue until every [`IngestHandle`] is dropped.
    pub async fn run(mut self) {
        info!("Ingestion worker started");
        while let Some(scan) = self.rx.recv().await {
            if let Err(e) = self.process(scan) {
                error!("Skipping scan: {e}");
            }
        }
        warn!("Ingestion worker stopped: all transports closed");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
