//! Property and fuzz-style tests for robustness of core data structures.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;
use uvsentry::config::SystemConfig;
use uvsentry::control::filter::{NoiseFilter, FILTER_WINDOW};
use uvsentry::fsm::context::FsmContext;
use uvsentry::fsm::states::build_state_table;
use uvsentry::fsm::{Fsm, StateId};
use uvsentry::watchdog::{RestartDecision, RestartWatchdog};

// ── Noise filter invariants ──────────────────────────────────

fn arb_distance() -> impl Strategy<Value = f32> {
    // Plausible post-validation HC-SR04 range.
    2.0f32..500.0f32
}

proptest! {
    /// The returned average always equals the mean of the most recent
    /// min(n, window) samples, regardless of the input sequence.
    #[test]
    fn average_tracks_most_recent_window(
        samples in proptest::collection::vec(arb_distance(), 1..=64),
    ) {
        let mut filter = NoiseFilter::new();
        for (i, &s) in samples.iter().enumerate() {
            let avg = filter.update(s);
            let start = (i + 1).saturating_sub(FILTER_WINDOW);
            let window = &samples[start..=i];
            let expected: f32 = window.iter().sum::<f32>() / window.len() as f32;
            prop_assert!(
                (avg - expected).abs() < 0.01,
                "sample {}: got {}, expected {}", i, avg, expected
            );
        }
    }

    /// The window never grows past its capacity and the average always
    /// stays within the min/max of the inputs seen so far.
    #[test]
    fn average_is_bounded_by_inputs(
        samples in proptest::collection::vec(arb_distance(), 1..=64),
    ) {
        let mut filter = NoiseFilter::new();
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for &s in &samples {
            lo = lo.min(s);
            hi = hi.max(s);
            let avg = filter.update(s);
            prop_assert!(filter.len() <= FILTER_WINDOW);
            prop_assert!(avg >= lo - 0.01 && avg <= hi + 0.01);
        }
    }
}

// ── FSM invariants under arbitrary sensor traces ─────────────

proptest! {
    /// However the filtered distance jitters, a single continuous
    /// on-period never exceeds the cutoff by more than one tick.
    #[test]
    fn on_time_never_exceeds_cutoff(
        distances in proptest::collection::vec(arb_distance(), 1..=400),
        period_ms in 50u64..=500u64,
    ) {
        let config = SystemConfig::default();
        let cutoff = u64::from(config.max_on_duration_ms);
        let mut ctx = FsmContext::new(config);
        let mut fsm = Fsm::new(build_state_table(), StateId::Off);
        fsm.start(&mut ctx);

        let mut now = 0u64;
        for cm in distances {
            now += period_ms;
            ctx.now_ms = now;
            ctx.filtered_cm = cm;
            fsm.tick(&mut ctx);

            if let Some(since) = ctx.on_since_ms {
                prop_assert!(fsm.current_state() == StateId::On);
                prop_assert!(
                    now - since <= cutoff + period_ms,
                    "lamp on for {} ms, cutoff {}", now - since, cutoff
                );
            } else {
                prop_assert!(fsm.current_state() == StateId::Off);
            }
            // Command mirrors state on every tick.
            prop_assert_eq!(ctx.commands.uv_on, fsm.current_state() == StateId::On);
        }
    }
}

// ── Watchdog boundary ────────────────────────────────────────

proptest! {
    /// The restart decision is exactly `elapsed > interval` for any
    /// arming time and probe time.
    #[test]
    fn restart_decision_matches_elapsed(
        interval in 1u32..=3_600_000u32,
        armed_at in 0u64..=1_000_000u64,
        probe_offset in 0u64..=4_000_000u64,
    ) {
        let wd = RestartWatchdog::new(interval, armed_at);
        let now = armed_at + probe_offset;
        let expected = if probe_offset > u64::from(interval) {
            RestartDecision::Restart
        } else {
            RestartDecision::Continue
        };
        prop_assert_eq!(wd.check(now), expected);
        prop_assert_eq!(wd.elapsed_ms(now), probe_offset);
    }
}
