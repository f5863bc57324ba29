//! Hardware drivers — actuator control and one-shot peripheral init.

pub mod hw_init;
pub mod uvc;
