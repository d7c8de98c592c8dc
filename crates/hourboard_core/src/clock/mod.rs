//! Clock heartbeat and time sources.
//!
//! # Responsibility
//! - Produce one timestamp per tick and broadcast it on the time bus.
//! - Keep the time source swappable for simulation and tests.

pub mod driver;
pub mod source;
