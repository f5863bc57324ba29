//! Adapters — the outer ring of the hexagonal architecture.
//!
//! Each adapter implements one or more port traits from
//! [`crate::app::ports`] against a concrete backend (GPIO/ADC drivers,
//! serial log, MQTT broker, monotonic clock).

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
