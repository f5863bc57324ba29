//! Sliding-window noise filter for distance samples.
//!
//! The HC-SR04 occasionally undershoots by tens of centimetres for a single
//! reading. A bounded FIFO window with a running arithmetic mean suppresses
//! those transients before the reading reaches the controller.
//!
//! Callers discard driver faults and implausible (≤ 2 cm) readings before
//! calling [`NoiseFilter::update`] — this component never rejects input
//! itself.

use heapless::Deque;

/// Window capacity: 8 historical samples + 1 incoming.
pub const FILTER_WINDOW: usize = 9;

/// Bounded FIFO window of recent valid distance samples.
#[derive(Debug, Default)]
pub struct NoiseFilter {
    window: Deque<f32, FILTER_WINDOW>,
}

impl NoiseFilter {
    pub fn new() -> Self {
        Self {
            window: Deque::new(),
        }
    }

    /// Append a sample, evicting the oldest once capacity is exceeded, and
    /// return the arithmetic mean of all samples currently held.
    pub fn update(&mut self, sample_cm: f32) -> f32 {
        if self.window.is_full() {
            let _ = self.window.pop_front();
        }
        // Cannot fail: a slot was just freed if the deque was full.
        let _ = self.window.push_back(sample_cm);
        self.average()
    }

    /// Arithmetic mean of the current window contents.
    ///
    /// Calling this on an empty window is a contract violation — the per-tick
    /// call discipline guarantees at least one sample — and fails fast rather
    /// than returning a sentinel.
    pub fn average(&self) -> f32 {
        assert!(
            !self.window.is_empty(),
            "average over empty filter window (call discipline violated)"
        );
        let sum: f32 = self.window.iter().sum();
        sum / self.window.len() as f32
    }

    /// Number of samples currently held, in `[0, FILTER_WINDOW]`.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
