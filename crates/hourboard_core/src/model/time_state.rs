//! Row time-state model.
//!
//! # Responsibility
//! - Define the three visual/editability states a row can be in.
//! - Provide the pure hour comparison that selects a state.
//!
//! # Invariants
//! - `derive_time_state` is a pure function of `(row_hour, current_hour)`.
//! - Only `TimeState::Before` locks note input.

use serde::Serialize;

/// Relationship between a row's scheduled hour and the latest observed hour.
///
/// **Read the labels carefully.** They describe the row relative to *now*:
///
/// | state     | condition                    | meaning                         |
/// |-----------|------------------------------|---------------------------------|
/// | `Before`  | `current_hour > row_hour`    | row hour already passed, locked |
/// | `Current` | `current_hour == row_hour`   | row hour is happening now       |
/// | `After`   | `current_hour < row_hour`    | row hour is still upcoming      |
///
/// `Before` does *not* mean "not yet reached". It means the row sits before
/// now on today's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeState {
    /// Row hour lies before now (already passed). Input is locked.
    Before,
    /// Row hour is the current hour.
    Current,
    /// Row hour lies after now (upcoming).
    After,
}

impl TimeState {
    /// Visual marker name applied to a row's element while in this state.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Before => "time-state-before",
            Self::Current => "time-state-current",
            Self::After => "time-state-after",
        }
    }

    /// Whether rows in this state refuse edits and saves.
    pub fn locks_input(self) -> bool {
        matches!(self, Self::Before)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::Current => "current",
            Self::After => "after",
        }
    }
}

/// Selects the state for a row scheduled at `row_hour` when the latest
/// observed hour is `current_hour`.
///
/// See [`TimeState`] for why a passed hour maps to `Before`.
pub fn derive_time_state(row_hour: u32, current_hour: u32) -> TimeState {
    if current_hour == row_hour {
        TimeState::Current
    } else if current_hour > row_hour {
        TimeState::Before
    } else {
        TimeState::After
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_time_state, TimeState};

    #[test]
    fn every_hour_pair_maps_to_exactly_one_state() {
        for row_hour in 0..24 {
            for current_hour in 0..24 {
                let expected = match current_hour.cmp(&row_hour) {
                    std::cmp::Ordering::Equal => TimeState::Current,
                    std::cmp::Ordering::Greater => TimeState::Before,
                    std::cmp::Ordering::Less => TimeState::After,
                };
                assert_eq!(derive_time_state(row_hour, current_hour), expected);
            }
        }
    }

    #[test]
    fn only_before_locks_input() {
        assert!(TimeState::Before.locks_input());
        assert!(!TimeState::Current.locks_input());
        assert!(!TimeState::After.locks_input());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&TimeState::Before).unwrap();
        assert_eq!(json, "\"before\"");
    }
}
