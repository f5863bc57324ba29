//! Lamp drive-current sensor.
//!
//! The UV lamp's supply current develops a voltage across a 47 Ω shunt,
//! tapped through a divider into a 10-bit ADC input. The raw sample maps
//! linearly onto 0–3.3 V; dividing by the shunt value (×1000 for mA) gives
//! the instantaneous drive current.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the ADC1 current-sense channel via the oneshot API
//! (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::error::SensorError;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_CURRENT_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_current_adc(raw: u16) {
    SIM_CURRENT_ADC.store(raw, Ordering::Relaxed);
}

const ADC_MAX: f32 = 1023.0;
const V_REF: f32 = 3.3;
const SHUNT_OHMS: f32 = 47.0;

#[derive(Debug, Clone, Copy)]
pub struct CurrentReading {
    pub raw: u16,
    pub volts: f32,
    pub milliamps: f32,
}

pub struct CurrentSensor {
    _adc_gpio: i32,
}

impl CurrentSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
        }
    }

    pub fn read(&mut self) -> Result<CurrentReading, SensorError> {
        let raw = self.read_adc()?;
        let volts = (f32::from(raw) / ADC_MAX) * V_REF;
        Ok(CurrentReading {
            raw,
            volts,
            milliamps: volts / SHUNT_OHMS * 1000.0,
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(pins::CURRENT_ADC_CHANNEL)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        Ok(SIM_CURRENT_ADC.load(Ordering::Relaxed))
    }
}
