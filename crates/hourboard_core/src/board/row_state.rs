//! Per-row time-state machine.
//!
//! # Responsibility
//! - Recompute a row's state from an observed timestamp.
//! - Apply marker and lock side effects only on actual transitions.
//!
//! # Invariants
//! - Re-observing an unchanged state causes no view calls.
//! - The input is disabled iff the new state is `TimeState::Before`.

use crate::board::view::RowView;
pub use crate::model::time_state::derive_time_state;
use crate::model::row::RowMetadata;
use crate::model::time_state::TimeState;
use crate::model::timestamp::Timestamp;
use log::debug;

/// A state change applied to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTransition {
    pub row_index: u32,
    /// `None` on the first observation.
    pub from: Option<TimeState>,
    pub to: TimeState,
}

/// Moves `row` to the state implied by `now`, updating `view` on change.
///
/// Returns `None` when the state is unchanged.
pub fn update_row_time_state(
    row: &mut RowMetadata,
    view: &mut dyn RowView,
    now: &Timestamp,
) -> Option<TimeTransition> {
    let next = derive_time_state(row.total_hours(), now.hour());
    let previous = row.current_time_state();
    if previous == Some(next) {
        return None;
    }

    if let Some(previous) = previous {
        view.remove_marker(previous.marker());
    }
    row.set_time_state(next);
    view.add_marker(next.marker());
    view.set_disabled(next.locks_input());

    debug!(
        "event=row_transition module=board row={} from={} to={}",
        row.row_index(),
        previous.map_or("none", TimeState::as_str),
        next.as_str()
    );
    Some(TimeTransition {
        row_index: row.row_index(),
        from: previous,
        to: next,
    })
}
