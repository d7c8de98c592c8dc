//! Hourly board runtime.
//!
//! # Responsibility
//! - Drive each row's time state from clock ticks.
//! - Route UI edit/save actions to rows and persistence.
//!
//! # Invariants
//! - The board owns its registry; there is no process-global row state.

pub mod registry;
pub mod row;
pub mod row_state;
pub mod session;
pub mod view;
