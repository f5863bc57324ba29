//! HC-SR04 ultrasonic range sensor driver.
//!
//! A 10 µs trigger pulse starts a measurement; the sensor answers with an
//! echo pulse whose width encodes the acoustic round-trip time. Width in
//! microseconds divided by 58 gives centimetres.
//!
//! A missing echo (nothing in range, or a flaky module) is a transient
//! fault, reported as [`SensorError::EchoTimeout`]. The sensor also has a
//! documented lower-bound artifact — readings at or below ~2 cm are noise;
//! the caller discards those before filtering.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the trigger GPIO and times the echo GPIO against
//! `esp_timer_get_time()`.
//! On host/test: reads a static `AtomicU32` echo width for injection
//! (`u32::MAX` simulates an echo timeout).

use core::sync::atomic::AtomicU32;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::error::SensorError;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_ECHO_US: AtomicU32 = AtomicU32::new(u32::MAX);

/// Inject a simulated echo pulse width (µs). `u32::MAX` = echo timeout.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(us: u32) {
    SIM_ECHO_US.store(us, Ordering::Relaxed);
}

/// Speed-of-sound round trip: 58 µs of echo per centimetre of distance.
const US_PER_CM: f32 = 58.0;
/// Give up waiting for the echo after this long (~4 m of range).
#[cfg(target_os = "espidf")]
const ECHO_TIMEOUT_US: u64 = 30_000;

#[derive(Debug, Clone, Copy)]
pub struct DistanceReading {
    /// Raw echo pulse width (µs).
    pub echo_us: u32,
    /// Derived distance (cm).
    pub cm: f32,
}

pub struct UltrasonicSensor {
    _trig_gpio: i32,
    _echo_gpio: i32,
}

impl UltrasonicSensor {
    pub fn new(trig_gpio: i32, echo_gpio: i32) -> Self {
        Self {
            _trig_gpio: trig_gpio,
            _echo_gpio: echo_gpio,
        }
    }

    /// Single-shot distance measurement.
    pub fn measure(&mut self) -> Result<DistanceReading, SensorError> {
        let echo_us = self.read_echo_us()?;
        Ok(DistanceReading {
            echo_us,
            cm: echo_us as f32 / US_PER_CM,
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_echo_us(&self) -> Result<u32, SensorError> {
        // SAFETY note lives in hw_init: single-threaded main-loop access only.
        let now_us = || unsafe { esp_idf_svc::sys::esp_timer_get_time() } as u64;

        // 10 µs trigger pulse.
        hw_init::gpio_write(pins::ULTRASONIC_TRIG_GPIO, false);
        busy_wait_us(&now_us, 5);
        hw_init::gpio_write(pins::ULTRASONIC_TRIG_GPIO, true);
        busy_wait_us(&now_us, 10);
        hw_init::gpio_write(pins::ULTRASONIC_TRIG_GPIO, false);

        // Wait for the echo line to rise.
        let deadline = now_us() + ECHO_TIMEOUT_US;
        while !hw_init::gpio_read(pins::ULTRASONIC_ECHO_GPIO) {
            if now_us() > deadline {
                return Err(SensorError::EchoTimeout);
            }
        }

        // Time the high pulse.
        let rise = now_us();
        while hw_init::gpio_read(pins::ULTRASONIC_ECHO_GPIO) {
            if now_us() > rise + ECHO_TIMEOUT_US {
                return Err(SensorError::EchoTimeout);
            }
        }
        Ok((now_us() - rise) as u32)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_echo_us(&self) -> Result<u32, SensorError> {
        match SIM_ECHO_US.load(Ordering::Relaxed) {
            u32::MAX => Err(SensorError::EchoTimeout),
            us => Ok(us),
        }
    }
}

#[cfg(target_os = "espidf")]
fn busy_wait_us(now_us: &impl Fn() -> u64, us: u64) {
    let until = now_us() + us;
    while now_us() < until {
        core::hint::spin_loop();
    }
}
