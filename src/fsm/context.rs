//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the latest filtered distance, the monotonic clock, the lamp
//! command output, configuration, and the on-since timestamp. It replaces
//! what would otherwise be ambient module-level state — every tick passes
//! it by exclusive reference.

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Actuator command (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Command the state handlers write to request actuator action.
/// The service applies it to the driver after each FSM tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct LampCommand {
    /// Desired UV lamp state.
    pub uv_on: bool,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// Monotonic uptime at the current tick (ms). Written by the service
    /// before each FSM tick.
    pub now_ms: u64,

    // -- Sensor data --
    /// Latest windowed-average distance (cm). Valid whenever the FSM is
    /// ticked — the service never ticks on an empty filter window.
    pub filtered_cm: f32,

    // -- Controller state --
    /// Uptime at the Off→On transition. `Some` exactly while the lamp is
    /// commanded on; cleared on the transition back to Off.
    pub on_since_ms: Option<u64>,

    // -- Actuator output --
    pub commands: LampCommand,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            now_ms: 0,
            filtered_cm: 0.0,
            on_since_ms: None,
            commands: LampCommand::default(),
            config,
        }
    }

    /// Milliseconds the lamp has been on, or 0 when off.
    pub fn ms_since_on(&self) -> u64 {
        self.on_since_ms
            .map_or(0, |since| self.now_ms.saturating_sub(since))
    }
}
