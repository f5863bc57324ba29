//! Sensor subsystem — the distance and lamp-current drivers.
//!
//! Both drivers are dual-target: raw ESP-IDF reads on `espidf`, atomic
//! injection points on the host so tests can script readings.

pub mod current;
pub mod ultrasonic;
