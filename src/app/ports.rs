//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Single-shot distance measurement (cm). A transient driver fault is
    /// an `Err`; the caller logs it and skips the tick's filter update.
    fn read_distance_cm(&mut self) -> Result<f32, SensorError>;

    /// Instantaneous lamp drive current (mA). Queried on lamp transitions
    /// and for heartbeats, never on the hot path.
    fn read_current_ma(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the lamp.
pub trait ActuatorPort {
    /// Command the UV lamp on or off.
    fn set_uv(&mut self, on: bool);

    /// Read back the commanded lamp state.
    fn uv_is_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, MQTT).
/// Implementations are best-effort by contract — they must never propagate
/// a delivery failure back into the control loop.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
