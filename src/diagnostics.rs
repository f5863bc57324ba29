//! Runtime diagnostics and restart hooks.
//!
//! Thin wrappers over the ESP-IDF system calls the main loop needs for
//! its heartbeat payload and the scheduled restart. Host builds get
//! inert stand-ins so the rest of the crate stays testable.

use log::warn;

/// Free heap in bytes. Host builds report 0.
#[cfg(target_os = "espidf")]
pub fn free_heap_bytes() -> u32 {
    unsafe { esp_idf_sys::esp_get_free_heap_size() }
}

#[cfg(not(target_os = "espidf"))]
pub fn free_heap_bytes() -> u32 {
    0
}

/// Trigger a full software restart. Does not return on target.
#[cfg(target_os = "espidf")]
pub fn restart() -> ! {
    warn!("software restart requested");
    unsafe { esp_idf_sys::esp_restart() };
    unreachable!()
}

#[cfg(not(target_os = "espidf"))]
pub fn restart() -> ! {
    warn!("software restart requested");
    std::process::exit(0)
}
