//! Domain model for the hourly schedule board.
//!
//! # Responsibility
//! - Define the timestamp, time-state, and row records used across core.
//!
//! # Invariants
//! - Exactly one row exists per hour of the day.
//! - Row time state is derived from observed time, never set by UI actions.

pub mod row;
pub mod time_state;
pub mod timestamp;
