//! UV lamp driver (relay-switched, strictly on/off).
//!
//! Single GPIO enable line into the lamp relay. The driver mirrors the
//! commanded state in memory so the controller can read it back without a
//! GPIO round-trip, and `set()` is a no-op when the commanded state already
//! matches.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real enable GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use log::info;

use crate::drivers::hw_init;
use crate::pins;

pub struct UvcDriver {
    on: bool,
}

impl UvcDriver {
    pub fn new() -> Self {
        Self { on: false }
    }

    /// Command the lamp. Already-matching commands are skipped.
    pub fn set(&mut self, on: bool) {
        if self.on == on {
            return;
        }
        hw_init::gpio_write(pins::UV_ENABLE_GPIO, on);
        self.on = on;
        info!("UVC: lamp {}", if on { "on" } else { "off" });
    }

    /// Read back the commanded state.
    pub fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_back() {
        let mut uvc = UvcDriver::new();
        assert!(!uvc.is_on());
        uvc.set(true);
        assert!(uvc.is_on());
        uvc.set(true); // no-op
        assert!(uvc.is_on());
        uvc.set(false);
        assert!(!uvc.is_on());
    }
}
