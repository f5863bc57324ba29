//! GPIO / peripheral pin assignments for the UVSentry main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic range sensor
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse starts a measurement.
pub const ULTRASONIC_TRIG_GPIO: i32 = 13;
/// Digital input: echo pulse width encodes the round-trip time.
/// Needs a divider — the module echoes at 5 V.
pub const ULTRASONIC_ECHO_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// UV lamp driver
// ---------------------------------------------------------------------------

/// Digital output: enables the UV lamp driver (active HIGH).
pub const UV_ENABLE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Lamp current sense — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Shunt voltage tap via resistive divider, 10-bit ADC channel.
pub const CURRENT_ADC_GPIO: i32 = 34;
/// ADC1 channel number for the current-sense input.
pub const CURRENT_ADC_CHANNEL: u32 = 6;
