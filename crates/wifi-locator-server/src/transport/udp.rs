//! Datagram transport for scanner devices.
//!
//! Each UDP datagram carries one JSON scan message. Malformed datagrams are
//! logged and dropped; the receiver keeps running.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

use super::forward;
use crate::ingest::IngestHandle;

/// Largest datagram accepted. A scan of ~100 networks fits comfortably.
const MAX_DATAGRAM: usize = 16 * 1024;

/// Bind `addr` and forward every valid scan to `ingest`.
///
/// Returns when the ingestion worker shuts down or the socket cannot be
/// bound.
pub async fn udp_receiver_task(addr: SocketAddr, ingest: IngestHandle) {
    let socket = match UdpSocket::bind(addr).await {
        Ok(s) => {
            info!("UDP listening on {addr} for scan messages");
            s
        }
        Err(e) => {
            error!("Failed to bind UDP {addr}: {e}");
            return;
        }
    };
    receive_loop(socket, ingest).await;
}

/// Receive datagrams from an already bound socket.
pub async fn receive_loop(socket: UdpSocket, ingest: IngestHandle) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, src)) => {
                debug!("Datagram from {src}: {len} bytes");
                if !forward(&ingest, &buf[..len], src).await {
                    return;
                }
            }
            Err(e) => {
                warn!("UDP recv error: {e}");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
