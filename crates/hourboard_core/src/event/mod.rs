//! In-process event primitives.

pub mod bus;
