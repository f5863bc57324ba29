//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap. This is the classic embedded C FSM pattern expressed
//! in safe Rust.
//!
//! ```text
//!  OFF ──[avg distance < on threshold]──▶ ON
//!   ▲                                      │
//!   └───────[on-time > max cutoff]─────────┘
//! ```
//!
//! There is deliberately no distance-based release: once on, the lamp only
//! turns off when the max-on-time cutoff expires. A rising distance while
//! `On` is ignored, which prevents on/off chatter from noisy readings near
//! the threshold.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: StateId::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
        // Index 1 — On
        StateDescriptor {
            id: StateId::On,
            name: "On",
            on_enter: Some(on_enter),
            on_exit: None,
            on_update: on_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF state
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut FsmContext) {
    ctx.commands.uv_on = false;
    ctx.on_since_ms = None;
    info!("OFF: lamp released, monitoring distance");
}

fn off_update(ctx: &mut FsmContext) -> Option<StateId> {
    // Trigger: windowed average below the on threshold.
    if ctx.filtered_cm < ctx.config.on_threshold_cm {
        info!(
            "OFF: avg distance {:.1} cm < {:.1} cm threshold → lamp on",
            ctx.filtered_cm, ctx.config.on_threshold_cm
        );
        return Some(StateId::On);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ON state — lamp energised, waiting out the max-on-time cutoff
// ═══════════════════════════════════════════════════════════════════════════

fn on_enter(ctx: &mut FsmContext) {
    ctx.on_since_ms = Some(ctx.now_ms);
    ctx.commands.uv_on = true;
    info!(
        "ON: lamp energised, cutoff in {} ms",
        ctx.config.max_on_duration_ms
    );
}

fn on_update(ctx: &mut FsmContext) -> Option<StateId> {
    let Some(since) = ctx.on_since_ms else {
        // Invariant breach: on_since is always recorded by on_enter.
        warn!("ON: missing on-since timestamp, releasing lamp");
        return Some(StateId::Off);
    };

    // Only the timeout releases the lamp; distance is ignored here.
    if ctx.now_ms.saturating_sub(since) > u64::from(ctx.config.max_on_duration_ms) {
        info!(
            "ON: max on-time exceeded ({} ms) → lamp off",
            ctx.now_ms.saturating_sub(since)
        );
        return Some(StateId::Off);
    }
    None
}
