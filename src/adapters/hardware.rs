//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the sensor drivers and the lamp driver, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::uvc::UvcDriver;
use crate::error::SensorError;
use crate::sensors::current::CurrentSensor;
use crate::sensors::ultrasonic::UltrasonicSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    ultrasonic: UltrasonicSensor,
    current: CurrentSensor,
    uvc: UvcDriver,
}

impl HardwareAdapter {
    pub fn new(ultrasonic: UltrasonicSensor, current: CurrentSensor, uvc: UvcDriver) -> Self {
        Self {
            ultrasonic,
            current,
            uvc,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_distance_cm(&mut self) -> Result<f32, SensorError> {
        Ok(self.ultrasonic.measure()?.cm)
    }

    fn read_current_ma(&mut self) -> Result<f32, SensorError> {
        Ok(self.current.read()?.milliamps)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_uv(&mut self, on: bool) {
        self.uvc.set(on);
    }

    fn uv_is_on(&self) -> bool {
        self.uvc.is_on()
    }
}
