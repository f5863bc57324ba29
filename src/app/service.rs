//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the FSM, the noise filter, and the shared context.
//! It exposes a clean, hardware-agnostic API. All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//! ActuatorPort ◀──│  NoiseFilter · FSM      │
//!                 └────────────────────────┘
//! ```
//!
//! Per-tick order is fixed: sense → filter → FSM decision → actuator →
//! transition telemetry. The watchdog check and the inter-tick sleep live
//! in the main loop.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::filter::NoiseFilter;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    filter: NoiseFilter,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`Self::start`] next.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Off);
        Self {
            fsm,
            ctx,
            filter: NoiseFilter::new(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial state (lamp off).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started {
            state: self.fsm.current_state(),
        });
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read distance → filter → FSM → actuator
    /// → transition telemetry.
    ///
    /// `now_ms` is the monotonic uptime for this tick. The `hw` parameter
    /// satisfies **both** [`SensorPort`] and [`ActuatorPort`] — this avoids
    /// a double mutable borrow while keeping the port boundary explicit.
    ///
    /// Sensor faults never mutate controller state: they are logged,
    /// telemetered, and the tick carries on with the existing window.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now_ms = now_ms;

        // 1. Read distance via SensorPort.
        match hw.read_distance_cm() {
            Ok(cm) if cm <= self.ctx.config.min_valid_distance_cm => {
                // Lower-bound artifact — discarded before the filter, not an error.
                debug!("distance {:.1} cm is sensor noise, discarded", cm);
            }
            Ok(cm) => {
                self.ctx.filtered_cm = self.filter.update(cm);
            }
            Err(e) => {
                warn!("distance read failed: {} — continuing", e);
                sink.emit(&AppEvent::SensorFault { kind: e.into() });
            }
        }

        // 2. FSM decision. Skipped until the first valid sample exists, so
        //    the empty-window average is structurally unreachable; after
        //    that the FSM ticks even through sensor dropout, which keeps
        //    the max-on-time cutoff honored.
        if self.filter.is_empty() {
            return;
        }
        let prev_state = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        let new_state = self.fsm.current_state();

        // 3. On release, sample the draw while the lamp is still energised
        //    so the payload carries the load at cutoff, not the residual
        //    leakage after switch-off.
        let release_ma = if prev_state == StateId::On && new_state == StateId::Off {
            self.query_current(hw)
        } else {
            None
        };

        // 4. Apply the lamp command via ActuatorPort (no-op when the
        //    read-back already matches).
        self.apply_actuator(hw);

        // 5. Transition telemetry. The activation draw is sampled after
        //    the lamp command took effect.
        if new_state != prev_state {
            match new_state {
                StateId::On => {
                    let current_ma = self.query_current(hw);
                    sink.emit(&AppEvent::UvActivated {
                        distance_cm: self.ctx.filtered_cm,
                        current_ma,
                    });
                }
                StateId::Off => sink.emit(&AppEvent::UvTimeoutRelease {
                    current_ma: release_ma,
                }),
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Latest windowed-average distance (cm). Meaningful once at least one
    /// valid sample has been filtered.
    pub fn filtered_cm(&self) -> f32 {
        self.ctx.filtered_cm
    }

    /// Uptime at the Off→On transition, while the lamp is on.
    pub fn on_since_ms(&self) -> Option<u64> {
        self.ctx.on_since_ms
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_actuator(&self, hw: &mut impl ActuatorPort) {
        if hw.uv_is_on() != self.ctx.commands.uv_on {
            hw.set_uv(self.ctx.commands.uv_on);
        }
    }

    /// Best-effort current query — a failed read degrades the telemetry
    /// payload, never the control flow.
    fn query_current(&self, hw: &mut impl SensorPort) -> Option<f32> {
        match hw.read_current_ma() {
            Ok(ma) => Some(ma),
            Err(e) => {
                warn!("current read failed: {} — reporting without it", e);
                None
            }
        }
    }
}
