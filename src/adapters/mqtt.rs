//! Best-effort MQTT telemetry reporter.
//!
//! Implements [`EventSink`] by serialising each [`AppEvent`] to JSON and
//! publishing it on the configured status topic. Delivery is explicitly
//! lossy: one connect → publish → disconnect per event, no retry, no
//! queue, and every transport fault is caught, logged, and discarded —
//! the control loop must never stall because telemetry failed. The only
//! waiting the transport does is a bounded poll for the broker CONNACK,
//! because a publish on a still-connecting client fails outright.
//!
//! The transport itself is abstracted so the sink is testable off-target:
//! - ESP-IDF: [`EspMqttTransport`] over `esp_idf_svc::mqtt::client`.
//! - Host/test: [`NullTransport`], or a scripted failing transport.

use core::sync::atomic::{AtomicBool, Ordering};

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::SystemConfig;
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Transport abstraction
// ───────────────────────────────────────────────────────────────

/// One-shot publish channel to the telemetry broker.
///
/// Implementations open a fresh session per call and tear it down before
/// returning — there is no persistent connection to keep alive.
pub trait TelemetryTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;
}

/// A transport that discards all publishes. Default when no broker is
/// configured (and the quiet half of host-side tests).
pub struct NullTransport;

impl TelemetryTransport for NullTransport {
    fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), CommsError> {
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Connection wait
// ───────────────────────────────────────────────────────────────

/// How long one publish is allowed to wait for the broker CONNACK.
#[cfg(target_os = "espidf")]
const CONNECT_TIMEOUT_MS: u32 = 5_000;
#[cfg(target_os = "espidf")]
const CONNECT_POLL_MS: u32 = 50;

/// Poll `connected` until it goes true or `timeout_ms` elapses.
///
/// The ESP-IDF client connects on its own background task after the
/// constructor returns; a QoS0 publish before CONNACK fails outright, so
/// the publish path must not race the connection. `sleep_ms` is injected
/// so the deadline arithmetic is testable off-target.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn await_connection(
    connected: &AtomicBool,
    mut sleep_ms: impl FnMut(u32),
    timeout_ms: u32,
    poll_ms: u32,
) -> bool {
    let mut waited_ms = 0u32;
    while !connected.load(Ordering::SeqCst) {
        if waited_ms >= timeout_ms {
            return false;
        }
        sleep_ms(poll_ms);
        waited_ms += poll_ms;
    }
    true
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF transport
// ───────────────────────────────────────────────────────────────

/// MQTT transport over the ESP-IDF client. TLS is not configured — the
/// reference deployment runs plaintext on the local network.
#[cfg(target_os = "espidf")]
pub struct EspMqttTransport {
    broker_url: heapless::String<64>,
    client_id: heapless::String<32>,
    username: heapless::String<32>,
    password: heapless::String<32>,
}

#[cfg(target_os = "espidf")]
impl EspMqttTransport {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            broker_url: config.mqtt_broker_url.clone(),
            client_id: config.mqtt_client_id.clone(),
            username: config.mqtt_username.clone(),
            password: config.mqtt_password.clone(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl TelemetryTransport for EspMqttTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        use std::sync::Arc;

        use esp_idf_svc::mqtt::client::{
            EspMqttClient, EventPayload, MqttClientConfiguration, QoS,
        };

        let conf = MqttClientConfiguration {
            client_id: Some(self.client_id.as_str()),
            username: Some(self.username.as_str()),
            password: Some(self.password.as_str()),
            ..Default::default()
        };

        // Fresh session per event; the client disconnects on drop.
        let connected = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&connected);
        let mut client = EspMqttClient::new_cb(self.broker_url.as_str(), &conf, move |event| {
            if matches!(event.payload(), EventPayload::Connected(_)) {
                flag.store(true, Ordering::SeqCst);
            }
        })
        .map_err(|_| CommsError::ConnectFailed)?;

        // The connection is established on the client's background task;
        // publish only after the broker has acknowledged it.
        if !await_connection(
            &connected,
            esp_idf_hal::delay::FreeRtos::delay_ms,
            CONNECT_TIMEOUT_MS,
            CONNECT_POLL_MS,
        ) {
            return Err(CommsError::ConnectFailed);
        }

        client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(|_| CommsError::PublishFailed)?;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

/// Adapter that publishes every [`AppEvent`] as a JSON payload.
pub struct MqttEventSink<T: TelemetryTransport> {
    transport: T,
    topic: heapless::String<64>,
}

impl<T: TelemetryTransport> MqttEventSink<T> {
    pub fn new(transport: T, config: &SystemConfig) -> Self {
        Self {
            transport,
            topic: config.mqtt_topic.clone(),
        }
    }
}

impl<T: TelemetryTransport> EventSink for MqttEventSink<T> {
    fn emit(&mut self, event: &AppEvent) {
        let payload = match serde_json::to_vec(event) {
            Ok(p) => p,
            Err(_) => {
                warn!("telemetry: {} — event dropped", CommsError::EncodeFailed);
                return;
            }
        };
        if let Err(e) = self.transport.publish(self.topic.as_str(), &payload) {
            // Telemetry is lossy by contract: log and move on.
            warn!("telemetry: {} — event dropped", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::StateId;

    struct RecordingTransport {
        published: Vec<(String, Vec<u8>)>,
    }

    impl TelemetryTransport for RecordingTransport {
        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
            self.published.push((topic.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    struct UnreachableBroker;

    impl TelemetryTransport for UnreachableBroker {
        fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), CommsError> {
            Err(CommsError::ConnectFailed)
        }
    }

    #[test]
    fn events_publish_as_json_on_configured_topic() {
        let config = SystemConfig::default();
        let mut sink = MqttEventSink::new(
            RecordingTransport {
                published: Vec::new(),
            },
            &config,
        );

        sink.emit(&AppEvent::Started {
            state: StateId::Off,
        });
        sink.emit(&AppEvent::UvActivated {
            distance_cm: 70.0,
            current_ma: Some(35.1),
        });

        let published = &sink.transport.published;
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, config.mqtt_topic.as_str());
        let json = core::str::from_utf8(&published[1].1).unwrap();
        assert!(json.contains("\"event\":\"uv_activated\""));
        assert!(json.contains("70"));
    }

    #[test]
    fn publish_waits_for_broker_ack() {
        // Broker acknowledges after 150 ms of background connecting; the
        // wait must cover that and stop polling immediately afterwards.
        let connected = AtomicBool::new(false);
        let mut slept_ms = 0u32;
        let ok = await_connection(
            &connected,
            |ms| {
                slept_ms += ms;
                if slept_ms >= 150 {
                    connected.store(true, Ordering::SeqCst);
                }
            },
            5_000,
            50,
        );
        assert!(ok);
        assert_eq!(slept_ms, 150);
    }

    #[test]
    fn connection_wait_gives_up_at_deadline() {
        let connected = AtomicBool::new(false);
        let mut slept_ms = 0u32;
        let ok = await_connection(&connected, |ms| slept_ms += ms, 1_000, 50);
        assert!(!ok);
        assert_eq!(slept_ms, 1_000);
    }

    #[test]
    fn transport_failure_is_swallowed() {
        let config = SystemConfig::default();
        let mut sink = MqttEventSink::new(UnreachableBroker, &config);
        // Must not panic or propagate.
        sink.emit(&AppEvent::UvTimeoutRelease { current_ma: None });
        sink.emit(&AppEvent::Heartbeat {
            uptime_secs: 1,
            free_heap_bytes: 0,
        });
    }
}
