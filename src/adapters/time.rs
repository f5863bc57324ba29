//! Monotonic time adapter.
//!
//! All control timing (FSM tick timestamps, lamp cutoff, restart
//! watchdog) runs off a single monotonic uptime source so wall-clock
//! adjustments can never stretch or shrink an interval.
//!
//! On ESP-IDF this wraps `esp_timer_get_time` (µs since boot). On the
//! host it counts from an `Instant` captured at construction, which
//! keeps the same zero-at-boot semantics for tests.

/// Monotonic uptime clock.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    started: std::time::Instant,
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            started: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot.
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // esp_timer_get_time is monotonic µs since boot; non-negative.
        (unsafe { esp_idf_sys::esp_timer_get_time() } as u64) / 1000
    }

    /// Milliseconds since construction (host stand-in for boot time).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Whole seconds since boot, for heartbeat payloads.
    pub fn uptime_secs(&self) -> u64 {
        self.uptime_ms() / 1000
    }
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let clock = Esp32TimeAdapter::new();
        let a = clock.uptime_ms();
        let b = clock.uptime_ms();
        assert!(b >= a);
    }

    #[test]
    fn secs_derive_from_ms() {
        let clock = Esp32TimeAdapter::new();
        assert_eq!(clock.uptime_secs(), clock.uptime_ms() / 1000);
    }
}
