//! System configuration parameters
//!
//! All tunable parameters for the UVSentry controller. There is no CLI,
//! file, or environment override — the `Default` impl carries the
//! compiled-in reference values and is the single source of truth.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Control ---
    /// Filtered distance (cm) below which the UV lamp is switched on.
    pub on_threshold_cm: f32,
    /// Maximum continuous lamp on-time before the timeout cutoff (ms).
    pub max_on_duration_ms: u32,
    /// Readings at or below this value are HC-SR04 lower-bound artifacts
    /// and are discarded before filtering (cm).
    pub min_valid_distance_cm: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub loop_period_ms: u32,
    /// Scheduled full-restart interval (milliseconds)
    pub watchdog_interval_ms: u32,

    // --- Telemetry ---
    /// MQTT broker URL. TLS is disabled in the reference configuration.
    pub mqtt_broker_url: heapless::String<64>,
    /// MQTT client identifier.
    pub mqtt_client_id: heapless::String<32>,
    /// Topic all status events are published on.
    pub mqtt_topic: heapless::String<64>,
    /// Broker credentials.
    pub mqtt_username: heapless::String<32>,
    pub mqtt_password: heapless::String<32>,
}

fn fixed<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(s);
    out
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Control
            on_threshold_cm: 73.0,
            max_on_duration_ms: 30_000, // 30 s lamp cutoff
            min_valid_distance_cm: 2.0,

            // Timing
            loop_period_ms: 200,             // 5 Hz
            watchdog_interval_ms: 1_800_000, // 30 min

            // Telemetry
            mqtt_broker_url: fixed("mqtt://192.168.1.8:1883"),
            mqtt_client_id: fixed("uvsentry"),
            mqtt_topic: fixed("uvsentry/status"),
            mqtt_username: fixed("uvsentry"),
            mqtt_password: fixed("changeme"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.on_threshold_cm > c.min_valid_distance_cm);
        assert!(c.max_on_duration_ms > 0);
        assert!(c.loop_period_ms > 0);
        assert!(c.watchdog_interval_ms > 0);
        assert!(!c.mqtt_broker_url.is_empty());
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = SystemConfig::default();
        assert!(c.loop_period_ms < 1000, "loop period must stay sub-second");
        assert!(
            u64::from(c.max_on_duration_ms) < u64::from(c.watchdog_interval_ms),
            "lamp cutoff must expire well before the scheduled restart"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert!((c.on_threshold_cm - c2.on_threshold_cm).abs() < 0.001);
        assert_eq!(c.max_on_duration_ms, c2.max_on_duration_ms);
        assert_eq!(c.mqtt_topic, c2.mqtt_topic);
    }
}
