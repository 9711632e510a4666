//! Transports that carry scan messages from scanner devices.
//!
//! Every transport hands raw JSON payloads to the [`IngestHandle`]; none of
//! them estimates. Malformed payloads are logged and dropped.

pub mod mqtt;
pub mod udp;

pub use mqtt::{mqtt_subscriber_task, MqttConfig};
pub use udp::udp_receiver_task;

use std::fmt::Display;

use tracing::warn;

use crate::ingest::{IngestError, IngestHandle};

/// Queue one raw payload received from `source`.
///
/// Returns `false` once the ingestion worker has shut down and the
/// transport should stop.
pub(crate) async fn forward(ingest: &IngestHandle, payload: &[u8], source: impl Display) -> bool {
    match ingest.submit_raw(payload).await {
        Ok(()) => true,
        Err(IngestError::WorkerClosed) => {
            warn!("Ingestion worker closed; stopping transport for {source}");
            false
        }
        Err(e) => {
            warn!("Dropping scan from {source}: {e}");
            true
        }
    }
}
