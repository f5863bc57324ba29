//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │  StateTable                                       │
//! │  ┌────────┬──────────┬─────────┬────────────────┐ │
//! │  │ StateId │ on_enter │ on_exit │ on_update      │ │
//! │  ├────────┼──────────┼─────────┼────────────────┤ │
//! │  │ Off     │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Opt<> │ │
//! │  │ On      │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Opt<> │ │
//! │  └────────┴──────────┴─────────┴────────────────┘ │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state. If it
//! returns `Some(next_id)`, the engine runs `on_exit` for the current state,
//! then `on_enter` for the next, and updates the current pointer. All
//! functions receive `&mut FsmContext`, which holds the filtered distance,
//! the monotonic clock, the lamp command, and timing.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[repr(u8)]
pub enum StateId {
    Off = 0,
    On = 1,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a `u8` index back to `StateId`. Panics on out-of-range in
    /// debug builds; returns `Off` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::On,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Off
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and is driven with a
/// mutable [`FsmContext`] threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter (wraps at u64::MAX).
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    /// 3. Increment tick counter.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::context::FsmContext;
    use super::*;
    use crate::config::SystemConfig;

    fn make_ctx() -> FsmContext {
        FsmContext::new(SystemConfig::default())
    }

    fn make_fsm() -> Fsm {
        Fsm::new(states::build_state_table(), StateId::Off)
    }

    fn started() -> (Fsm, FsmContext) {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        (fsm, ctx)
    }

    #[test]
    fn starts_off_with_lamp_released() {
        let (fsm, ctx) = started();
        assert_eq!(fsm.current_state(), StateId::Off);
        assert!(!ctx.commands.uv_on);
        assert!(ctx.on_since_ms.is_none());
    }

    #[test]
    fn tick_increments_counter() {
        let (mut fsm, mut ctx) = started();
        ctx.filtered_cm = 100.0;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.ticks_in_current_state(), 1);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.ticks_in_current_state(), 2);
    }

    #[test]
    fn off_to_on_below_threshold_records_on_since() {
        let (mut fsm, mut ctx) = started();
        ctx.now_ms = 4_200;
        ctx.filtered_cm = ctx.config.on_threshold_cm - 1.0;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::On);
        assert!(ctx.commands.uv_on);
        assert_eq!(ctx.on_since_ms, Some(4_200));
    }

    #[test]
    fn off_stays_at_or_above_threshold() {
        let (mut fsm, mut ctx) = started();
        ctx.filtered_cm = ctx.config.on_threshold_cm;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);

        ctx.filtered_cm = ctx.config.on_threshold_cm + 50.0;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);
        assert!(!ctx.commands.uv_on);
    }

    #[test]
    fn on_ignores_distance_until_timeout() {
        let (mut fsm, mut ctx) = started();
        ctx.now_ms = 1_000;
        ctx.filtered_cm = 10.0;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::On);

        // Distance rises far above threshold — no early release.
        ctx.filtered_cm = 500.0;
        ctx.now_ms = 1_000 + u64::from(ctx.config.max_on_duration_ms);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::On, "elapsed == cutoff stays On");

        ctx.now_ms += 1;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);
        assert!(!ctx.commands.uv_on);
        assert!(ctx.on_since_ms.is_none());
    }

    #[test]
    fn on_transition_not_retriggered_while_on() {
        let (mut fsm, mut ctx) = started();
        ctx.now_ms = 500;
        ctx.filtered_cm = 10.0;
        fsm.tick(&mut ctx);
        assert_eq!(ctx.on_since_ms, Some(500));

        // Repeated ticks below threshold must not refresh on_since.
        for step in 1..10 {
            ctx.now_ms = 500 + step * 100;
            fsm.tick(&mut ctx);
        }
        assert_eq!(ctx.on_since_ms, Some(500));
        assert_eq!(fsm.current_state(), StateId::On);
    }

    #[test]
    fn retrigger_after_release_uses_fresh_timestamp() {
        let (mut fsm, mut ctx) = started();
        ctx.now_ms = 1_000;
        ctx.filtered_cm = 10.0;
        fsm.tick(&mut ctx);

        ctx.now_ms = 1_000 + u64::from(ctx.config.max_on_duration_ms) + 1;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::Off);

        // Still below threshold: the next tick re-arms with the new clock.
        ctx.now_ms += 200;
        fsm.tick(&mut ctx);
        assert_eq!(fsm.current_state(), StateId::On);
        assert_eq!(ctx.on_since_ms, Some(1_000 + u64::from(ctx.config.max_on_duration_ms) + 201));
    }

    #[test]
    fn state_id_from_index_roundtrip() {
        for i in 0..StateId::COUNT {
            let id = StateId::from_index(i);
            assert_eq!(id as usize, i);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::context::FsmContext;
    use super::*;
    use crate::config::SystemConfig;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn on_since_some_iff_on(
            distances in proptest::collection::vec(0.0f32..200.0, 1..200),
            step_ms in 1u64..5_000,
        ) {
            let mut fsm = Fsm::new(states::build_state_table(), StateId::Off);
            let mut ctx = FsmContext::new(SystemConfig::default());
            fsm.start(&mut ctx);

            let mut now = 0u64;
            for d in distances {
                now += step_ms;
                ctx.now_ms = now;
                ctx.filtered_cm = d;
                fsm.tick(&mut ctx);

                match fsm.current_state() {
                    StateId::On => {
                        prop_assert!(ctx.on_since_ms.is_some());
                        prop_assert!(ctx.commands.uv_on);
                    }
                    StateId::Off => {
                        prop_assert!(ctx.on_since_ms.is_none());
                        prop_assert!(!ctx.commands.uv_on);
                    }
                }
            }
        }

        #[test]
        fn on_time_never_exceeds_cutoff_plus_one_tick(
            step_ms in 1u64..2_000,
            ticks in 1usize..500,
        ) {
            let mut fsm = Fsm::new(states::build_state_table(), StateId::Off);
            let mut ctx = FsmContext::new(SystemConfig::default());
            fsm.start(&mut ctx);

            let cutoff = u64::from(ctx.config.max_on_duration_ms);
            let mut now = 0u64;
            for _ in 0..ticks {
                now += step_ms;
                ctx.now_ms = now;
                ctx.filtered_cm = 10.0; // permanently below threshold
                fsm.tick(&mut ctx);

                // Whenever the lamp is on, its continuous on-time is bounded
                // by the cutoff plus at most one tick of slack.
                prop_assert!(ctx.ms_since_on() <= cutoff + step_ms);
            }
        }
    }
}
