//! Scheduled-restart watchdog.
//!
//! Long-running unattended loops accumulate resource drift (heap
//! fragmentation, driver-level leaks) that no local handler can see. The
//! blunt mitigation is a full process restart on a fixed interval.
//!
//! The watchdog itself is pure bookkeeping: it holds the last-reset
//! timestamp and answers [`RestartWatchdog::check`] with a
//! [`RestartDecision`]. The main loop owns the side effects — emitting one
//! heartbeat event and calling the platform restart — so the terminal
//! action stays interceptable in tests.

use log::info;

/// Outcome of a watchdog check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// Within the interval — keep looping.
    Continue,
    /// Interval exceeded — emit one heartbeat, then restart the process.
    Restart,
}

/// Tracks elapsed time since process start and signals the scheduled restart.
pub struct RestartWatchdog {
    interval_ms: u64,
    /// Uptime at process start. Reset only by the restart itself.
    last_reset_ms: u64,
}

impl RestartWatchdog {
    /// Arm the watchdog at process start. `now_ms` is the current monotonic
    /// uptime; the interval comes from configuration.
    pub fn new(interval_ms: u32, now_ms: u64) -> Self {
        info!("Watchdog: armed, restart in {} ms", interval_ms);
        Self {
            interval_ms: u64::from(interval_ms),
            last_reset_ms: now_ms,
        }
    }

    /// Check the elapsed time. Returns [`RestartDecision::Restart`] once
    /// `now - last_reset` exceeds the interval.
    pub fn check(&self, now_ms: u64) -> RestartDecision {
        if now_ms.saturating_sub(self.last_reset_ms) > self.interval_ms {
            RestartDecision::Restart
        } else {
            RestartDecision::Continue
        }
    }

    /// Milliseconds since the watchdog was armed.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_reset_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_interval_continues() {
        let wd = RestartWatchdog::new(30_000, 0);
        assert_eq!(wd.check(0), RestartDecision::Continue);
        assert_eq!(wd.check(29_999), RestartDecision::Continue);
        assert_eq!(wd.check(30_000), RestartDecision::Continue);
    }

    #[test]
    fn past_interval_restarts() {
        let wd = RestartWatchdog::new(30_000, 0);
        assert_eq!(wd.check(30_001), RestartDecision::Restart);
    }

    #[test]
    fn boundary_one_ms_either_side() {
        let interval = 1_800_000u32; // reference 30 min
        let wd = RestartWatchdog::new(interval, 500);
        let armed_at = 500u64;
        assert_eq!(
            wd.check(armed_at + u64::from(interval) - 1),
            RestartDecision::Continue
        );
        assert_eq!(
            wd.check(armed_at + u64::from(interval) + 1),
            RestartDecision::Restart
        );
    }

    #[test]
    fn elapsed_tracks_arm_time() {
        let wd = RestartWatchdog::new(1_000, 2_000);
        assert_eq!(wd.elapsed_ms(2_500), 500);
        // Clock can never run backwards, but saturate anyway.
        assert_eq!(wd.elapsed_ms(1_000), 0);
    }
}
