//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the main loop emit
//! these through the [`EventSink`](super::ports::EventSink) port. Adapters
//! on the other side decide what to do with them — log to serial, publish
//! over MQTT. Events derive `Serialize` because the MQTT adapter ships them
//! as JSON payloads.

use serde::Serialize;

use crate::error::SensorError;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// The controller has started (carries initial state).
    Started { state: StateId },

    /// The lamp switched on: triggering windowed distance plus the current
    /// draw measured right after energising. `current_ma` is `None` when
    /// the current sensor itself faulted.
    UvActivated {
        distance_cm: f32,
        current_ma: Option<f32>,
    },

    /// The max-on-time cutoff released the lamp. The draw is sampled just
    /// before the lamp line drops, so it reflects the load at cutoff.
    UvTimeoutRelease { current_ma: Option<f32> },

    /// A transient sensor fault; the loop continues on the next tick.
    SensorFault { kind: SensorFaultKind },

    /// Watchdog heartbeat emitted immediately before the scheduled restart.
    Heartbeat {
        uptime_secs: u64,
        free_heap_bytes: u32,
    },
}

/// Serializable mirror of [`SensorError`] for telemetry payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorFaultKind {
    EchoTimeout,
    AdcReadFailed,
    GpioReadFailed,
    OutOfRange,
}

impl From<SensorError> for SensorFaultKind {
    fn from(e: SensorError) -> Self {
        match e {
            SensorError::EchoTimeout => Self::EchoTimeout,
            SensorError::AdcReadFailed => Self::AdcReadFailed,
            SensorError::GpioReadFailed => Self::GpioReadFailed,
            SensorError::OutOfRange => Self::OutOfRange,
        }
    }
}
