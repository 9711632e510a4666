//! WiFi Locator server library.
//!
//! This crate provides:
//! - The ingestion boundary and single-writer estimation worker
//! - MQTT and UDP transports for scanner devices
//! - The HTTP query API over the scan history
//! - Command-line configuration

pub mod api;
pub mod config;
pub mod ingest;
pub mod transport;
