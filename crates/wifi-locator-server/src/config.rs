//! Command-line and environment configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use wifi_locator_core::{CoordinateTable, Coordinates, EstimatorConfig};

use crate::transport::MqttConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "wifi-locator-server", version, about = "WiFi fingerprint location server")]
pub struct Args {
    /// HTTP port for the REST API and UI
    #[arg(long, env = "WIFI_LOCATOR_HTTP_PORT", default_value = "8000")]
    pub http_port: u16,

    /// UDP port for scan messages (0 disables the UDP transport)
    #[arg(long, env = "WIFI_LOCATOR_UDP_PORT", default_value = "5005")]
    pub udp_port: u16,

    /// MQTT broker host scanners publish to
    #[arg(long, env = "WIFI_LOCATOR_MQTT_BROKER", default_value = MqttConfig::DEFAULT_BROKER)]
    pub mqtt_broker: String,

    /// MQTT broker port (0 disables the MQTT subscription)
    #[arg(long, env = "WIFI_LOCATOR_MQTT_PORT", default_value_t = MqttConfig::DEFAULT_PORT)]
    pub mqtt_port: u16,

    /// MQTT topic carrying scan messages
    #[arg(long, env = "WIFI_LOCATOR_MQTT_TOPIC", default_value = MqttConfig::DEFAULT_TOPIC)]
    pub mqtt_topic: String,

    /// MQTT client id (defaults to one derived from the process id)
    #[arg(long, env = "WIFI_LOCATOR_MQTT_CLIENT_ID")]
    pub mqtt_client_id: Option<String>,

    /// MQTT keep-alive interval in seconds
    #[arg(long, env = "WIFI_LOCATOR_MQTT_KEEP_ALIVE", default_value = "60")]
    pub mqtt_keep_alive: u64,

    /// Fingerprint survey CSV (id, location, ssid, mac, rssi)
    #[arg(long, env = "WIFI_LOCATOR_FINGERPRINTS", default_value = "wifi_database_clean.csv")]
    pub fingerprints: PathBuf,

    /// Location coordinates JSON ({"LOC": {"lat": .., "lng": ..}})
    #[arg(long, env = "WIFI_LOCATOR_LOCATIONS", default_value = "locations.json")]
    pub locations: PathBuf,

    /// Directory of static UI files served at `/`
    #[arg(long, env = "WIFI_LOCATOR_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Latitude reported when no access point matches
    #[arg(long, env = "WIFI_LOCATOR_UNKNOWN_LAT", default_value_t = CoordinateTable::DEFAULT_UNKNOWN.lat)]
    pub unknown_lat: f64,

    /// Longitude reported when no access point matches
    #[arg(long, env = "WIFI_LOCATOR_UNKNOWN_LNG", default_value_t = CoordinateTable::DEFAULT_UNKNOWN.lng)]
    pub unknown_lng: f64,

    /// RSSI difference (dB) at or above which a reference gets no score
    #[arg(long, env = "WIFI_LOCATOR_MAX_DIFF_DB", default_value = "30")]
    pub max_diff_db: u32,

    /// Maximum scans waiting for the estimator
    #[arg(long, env = "WIFI_LOCATOR_INGEST_QUEUE", default_value = "1024")]
    pub ingest_queue: usize,
}

impl Args {
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.http_port))
    }

    /// UDP bind address, or `None` when the transport is disabled.
    pub fn udp_addr(&self) -> Option<SocketAddr> {
        (self.udp_port != 0).then(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.udp_port)))
    }

    /// MQTT subscription settings, or `None` when the subscription is disabled.
    pub fn mqtt_config(&self) -> Option<MqttConfig> {
        if self.mqtt_port == 0 || self.mqtt_broker.trim().is_empty() {
            return None;
        }
        let client_id = self
            .mqtt_client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(|| format!("wifi-locator-{}", std::process::id()), str::to_string);
        Some(MqttConfig {
            broker: self.mqtt_broker.trim().to_string(),
            port: self.mqtt_port,
            topic: self.mqtt_topic.clone(),
            client_id,
            keep_alive: Duration::from_secs(self.mqtt_keep_alive),
        })
    }

    pub fn unknown_coordinates(&self) -> Coordinates {
        Coordinates::new(self.unknown_lat, self.unknown_lng)
    }

    pub fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            max_diff_db: self.max_diff_db,
            ..EstimatorConfig::default()
        }
    }
}
