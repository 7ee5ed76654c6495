//! Adapter implementations of follow-up ports.

pub mod memory;
pub mod postgres;
