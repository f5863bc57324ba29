//! Application layer — port traits, events, and the control service.

pub mod events;
pub mod ports;
pub mod service;
