//! Hour row domain model.
//!
//! # Responsibility
//! - Define the per-hour record shared by the state machine, registry, and
//!   persistence sync.
//! - Derive the 12-hour clock label shown next to each row.
//!
//! # Invariants
//! - `row_index` is within `0..HOURS_PER_DAY` and never changes.
//! - `total_hours == row_index`.
//! - `current_time_state` starts as `None` and is only written by the row
//!   state machine.

use crate::model::time_state::TimeState;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const HOURS_PER_DAY: u32 = 24;

/// Stable identity of a row's save action element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaveTriggerId(Uuid);

impl SaveTriggerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SaveTriggerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SaveTriggerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// 12-hour clock label for a 24-hour index (`0 -> 12am`, `13 -> 1pm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockHour {
    pub value: u32,
    pub meridiem: Meridiem,
}

impl ClockHour {
    pub fn from_index(index: u32) -> Self {
        let value = (index + 11) % 12 + 1;
        let meridiem = if (index / 12) % 2 == 0 {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };
        Self { value, meridiem }
    }

    pub fn label(&self) -> String {
        let postfix = match self.meridiem {
            Meridiem::Am => "am",
            Meridiem::Pm => "pm",
        };
        format!("{}{postfix}", self.value)
    }
}

/// Row construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValidationError {
    HourOutOfRange(u32),
}

impl Display for RowValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourOutOfRange(hour) => {
                write!(f, "row hour {hour} is outside 0..{HOURS_PER_DAY}")
            }
        }
    }
}

impl Error for RowValidationError {}

/// Metadata for one hour row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMetadata {
    row_index: u32,
    total_hours: u32,
    clock_hour: ClockHour,
    save_trigger: SaveTriggerId,
    current_time_state: Option<TimeState>,
    note_text: String,
}

impl RowMetadata {
    /// Creates the row for `row_index` seeded with previously saved text.
    pub fn new(row_index: u32, note_text: impl Into<String>) -> Result<Self, RowValidationError> {
        Self::with_trigger(row_index, SaveTriggerId::new(), note_text)
    }

    /// Creates a row with a caller-provided save trigger identity.
    pub fn with_trigger(
        row_index: u32,
        save_trigger: SaveTriggerId,
        note_text: impl Into<String>,
    ) -> Result<Self, RowValidationError> {
        if row_index >= HOURS_PER_DAY {
            return Err(RowValidationError::HourOutOfRange(row_index));
        }
        let total_hours = row_index % HOURS_PER_DAY;
        Ok(Self {
            row_index,
            total_hours,
            clock_hour: ClockHour::from_index(total_hours),
            save_trigger,
            current_time_state: None,
            note_text: note_text.into(),
        })
    }

    pub fn row_index(&self) -> u32 {
        self.row_index
    }

    /// Scheduled hour compared against observed time.
    pub fn total_hours(&self) -> u32 {
        self.total_hours
    }

    pub fn clock_hour(&self) -> ClockHour {
        self.clock_hour
    }

    pub fn save_trigger(&self) -> SaveTriggerId {
        self.save_trigger
    }

    /// `None` until the first tick has been observed.
    pub fn current_time_state(&self) -> Option<TimeState> {
        self.current_time_state
    }

    pub fn note_text(&self) -> &str {
        &self.note_text
    }

    pub fn is_locked(&self) -> bool {
        self.current_time_state.is_some_and(TimeState::locks_input)
    }

    pub(crate) fn set_time_state(&mut self, state: TimeState) {
        self.current_time_state = Some(state);
    }

    pub(crate) fn set_note_text(&mut self, text: impl Into<String>) {
        self.note_text = text.into();
    }

    pub(crate) fn clear_note_text(&mut self) {
        self.note_text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{ClockHour, RowMetadata, RowValidationError};

    #[test]
    fn clock_hour_labels_follow_twelve_hour_sequence() {
        let labels: Vec<String> = [0, 1, 11, 12, 13, 23]
            .into_iter()
            .map(|index| ClockHour::from_index(index).label())
            .collect();
        assert_eq!(labels, vec!["12am", "1am", "11am", "12pm", "1pm", "11pm"]);
    }

    #[test]
    fn new_row_starts_without_state() {
        let row = RowMetadata::new(5, "lunch").unwrap();
        assert_eq!(row.row_index(), 5);
        assert_eq!(row.total_hours(), 5);
        assert_eq!(row.note_text(), "lunch");
        assert!(row.current_time_state().is_none());
        assert!(!row.is_locked());
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let err = RowMetadata::new(24, "").unwrap_err();
        assert_eq!(err, RowValidationError::HourOutOfRange(24));
    }

    #[test]
    fn each_row_gets_distinct_trigger() {
        let a = RowMetadata::new(1, "").unwrap();
        let b = RowMetadata::new(2, "").unwrap();
        assert_ne!(a.save_trigger(), b.save_trigger());
    }
}
