//! WiFi Locator Server
//!
//! Lightweight Axum server that:
//! - Loads the fingerprint survey (CSV) and location coordinates (JSON)
//! - Receives scan messages from ESP32 scanners via MQTT
//!   (`broker.hivemq.com:1883`, topic `esp32/wifi/scan`), UDP (port 5005)
//!   and `POST /api/scans`
//! - Estimates each device's location on a dedicated ingestion task
//! - Serves the scan history and the static UI over HTTP (port 8000)

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use wifi_locator_core::{load_coordinates, load_fingerprints, PositionEstimator, ScanHistory};
use wifi_locator_server::api::{create_router, AppState};
use wifi_locator_server::config::Args;
use wifi_locator_server::ingest::IngestWorker;
use wifi_locator_server::transport::{mqtt_subscriber_task, udp_receiver_task};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    // ── Reference data ───────────────────────────────────────────────────────
    let store = Arc::new(
        load_fingerprints(&args.fingerprints).context("loading fingerprint database")?,
    );
    let coords = Arc::new(
        load_coordinates(&args.locations, args.unknown_coordinates())
            .context("loading location coordinates")?,
    );

    // ── Ingestion ────────────────────────────────────────────────────────────
    let (writer, reader) = ScanHistory::new();
    let (worker, ingest) = IngestWorker::new(
        Arc::clone(&store),
        Arc::clone(&coords),
        PositionEstimator::with_config(args.estimator_config()),
        writer,
        args.ingest_queue,
    );
    tokio::spawn(worker.run());

    match args.mqtt_config() {
        Some(mqtt) => {
            tokio::spawn(mqtt_subscriber_task(mqtt, ingest.clone()));
        }
        None => info!("MQTT subscription disabled"),
    }

    if let Some(udp_addr) = args.udp_addr() {
        tokio::spawn(udp_receiver_task(udp_addr, ingest.clone()));
    }

    // ── HTTP ─────────────────────────────────────────────────────────────────
    let static_dir = args.static_dir.is_dir().then_some(args.static_dir.as_path());
    if static_dir.is_none() {
        info!("Static UI directory {} not found; serving API only", args.static_dir.display());
    }
    let state = AppState::new(store, coords, reader, ingest);
    let app = create_router(state, static_dir);

    let http_addr = args.http_addr();
    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("binding HTTP port {http_addr}"))?;
    info!("HTTP server listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => {
                    warn!("Cannot listen for CTRL+C ({e}); running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
        .context("HTTP server failed")?;

    info!("Server shut down cleanly");
    Ok(())
}
