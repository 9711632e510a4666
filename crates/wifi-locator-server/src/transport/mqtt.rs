//! MQTT subscription for scanner devices.
//!
//! ESP32 scanners publish one JSON scan message per publish on a shared
//! topic of a public broker. The subscriber (re)subscribes on every
//! `ConnAck`, so a dropped broker connection is picked up again by the
//! event loop's automatic reconnect.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tracing::{debug, error, info, warn};

use super::forward;
use crate::ingest::IngestHandle;

/// Requests buffered between the client handle and the event loop.
const EVENT_CAPACITY: usize = 16;

/// Pause before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub topic: String,
    pub client_id: String,
    pub keep_alive: Duration,
}

impl MqttConfig {
    pub const DEFAULT_BROKER: &'static str = "broker.hivemq.com";
    pub const DEFAULT_PORT: u16 = 1883;
    pub const DEFAULT_TOPIC: &'static str = "esp32/wifi/scan";
    pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

    pub fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id.as_str(), self.broker.as_str(), self.port);
        options.set_keep_alive(self.keep_alive);
        options
    }
}

/// Connect to the broker and forward every published scan to `ingest`.
///
/// Runs until the ingestion worker shuts down.
pub async fn mqtt_subscriber_task(config: MqttConfig, ingest: IngestHandle) {
    let (client, mut eventloop) = AsyncClient::new(config.options(), EVENT_CAPACITY);
    info!(
        "MQTT connecting to {}:{} as {} (topic {})",
        config.broker, config.port, config.client_id, config.topic
    );

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("MQTT connected; subscribing to {}", config.topic);
                if let Err(e) = client.subscribe(config.topic.as_str(), QoS::AtMostOnce).await {
                    error!("MQTT subscribe to {} failed: {e}", config.topic);
                    return;
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if !handle_publish(&ingest, &publish.topic, &publish.payload).await {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("MQTT connection error: {e}; retrying in {}s", RECONNECT_DELAY.as_secs());
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }

    if let Err(e) = client.disconnect().await {
        debug!("MQTT disconnect failed: {e}");
    }
}

/// Forward one publish payload.
///
/// Returns `false` once the ingestion worker has shut down.
pub async fn handle_publish(ingest: &IngestHandle, topic: &str, payload: &[u8]) -> bool {
    debug!("Publish on {topic}: {} bytes", payload.len());
    forward(ingest, payload, format!("MQTT topic {topic}")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ingest::IngestWorker;
    use wifi_locator_core::{
        AccessPointId, CoordinateTable, FingerprintStore, HistoryReader, PositionEstimator,
        ReferenceReading, ScanHistory,
    };

    const TOPIC: &str = MqttConfig::DEFAULT_TOPIC;
    const SCAN: &[u8] = br#"{"device_id":"esp32-mqtt","timestamp":7,"networks":[
        {"ssid":"eduroam","mac":"aa:aa:aa:aa:aa:aa","rssi":-58,"channel":1}]}"#;

    fn worker() -> (IngestWorker, IngestHandle, HistoryReader) {
        let mut builder = FingerprintStore::builder();
        builder.insert(
            AccessPointId::new("AA:AA:AA:AA:AA:AA"),
            ReferenceReading::new("LOC1", -60, "eduroam"),
        );
        let (writer, reader) = ScanHistory::new();
        let (worker, ingest) = IngestWorker::new(
            Arc::new(builder.build()),
            Arc::new(CoordinateTable::default()),
            PositionEstimator::new(),
            writer,
            8,
        );
        (worker, ingest, reader)
    }

    #[tokio::test]
    async fn publish_payloads_reach_the_history() {
        let (worker, ingest, reader) = worker();
        let task = tokio::spawn(worker.run());

        assert!(handle_publish(&ingest, TOPIC, b"not json").await);
        assert!(handle_publish(&ingest, TOPIC, br#"{"device_id":"x"}"#).await);
        assert!(handle_publish(&ingest, TOPIC, SCAN).await);

        drop(ingest);
        task.await.unwrap();

        assert_eq!(reader.len(), 1);
        let latest = reader.latest().unwrap();
        assert_eq!(latest.device_id, "esp32-mqtt");
        assert_eq!(latest.result.location_id.as_str(), "LOC1");
    }

    #[tokio::test]
    async fn publish_after_worker_shutdown_stops_subscriber() {
        let (worker, ingest, _reader) = worker();
        drop(worker);
        assert!(!handle_publish(&ingest, TOPIC, SCAN).await);
    }

    #[test]
    fn options_carry_broker_settings() {
        let config = MqttConfig {
            broker: MqttConfig::DEFAULT_BROKER.to_string(),
            port: MqttConfig::DEFAULT_PORT,
            topic: MqttConfig::DEFAULT_TOPIC.to_string(),
            client_id: "wifi-locator-test".to_string(),
            keep_alive: MqttConfig::DEFAULT_KEEP_ALIVE,
        };
        let options = config.options();
        assert_eq!(
            options.broker_address(),
            ("broker.hivemq.com".to_string(), 1883)
        );
        assert_eq!(options.keep_alive(), Duration::from_secs(60));
        assert_eq!(options.client_id(), "wifi-locator-test");
    }
}
