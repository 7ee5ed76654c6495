//! Adapter implementations of pipeline ports.

pub mod memory;
pub mod postgres;
