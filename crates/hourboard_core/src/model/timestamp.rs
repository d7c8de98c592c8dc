//! Wall-clock timestamp model.
//!
//! # Responsibility
//! - Wrap a local wall-clock instant with the accessors the board needs.
//! - Render the header display label shown on every tick.
//!
//! # Invariants
//! - Values are local wall-clock time; no timezone conversion happens here.
//! - `hour()` is always within `0..24`.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One observed instant in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp {
    local: NaiveDateTime,
}

impl Timestamp {
    pub fn from_naive(local: NaiveDateTime) -> Self {
        Self { local }
    }

    /// Reads the current local wall-clock time.
    pub fn now_local() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Builds a timestamp from calendar parts.
    ///
    /// Returns `None` when any part is out of range.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self::from_naive)
    }

    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    pub fn second(&self) -> u32 {
        self.local.second()
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.local
    }

    /// Returns the same instant with only the hour replaced.
    pub fn with_hour(&self, hour: u32) -> Option<Self> {
        self.local.with_hour(hour).map(Self::from_naive)
    }

    /// Returns this instant shifted by `seconds` (may be negative).
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        Self::from_naive(self.local + chrono::Duration::seconds(seconds))
    }

    /// True only for the exact `00:00:00` triple; there is no tolerance window.
    pub fn is_day_rollover(&self) -> bool {
        self.hour() == 0 && self.minute() == 0 && self.second() == 0
    }

    /// Locale-style label, e.g. `10/16/2026, 2:05:09 PM`.
    pub fn display_label(&self) -> String {
        self.local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S"))
    }
}
