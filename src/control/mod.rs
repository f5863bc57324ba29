//! Control algorithms — pure, hardware-free.

pub mod filter;
