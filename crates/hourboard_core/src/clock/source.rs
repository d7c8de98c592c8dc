//! Injectable time sources.
//!
//! # Responsibility
//! - Abstract "what time is it" behind a zero-argument call.
//! - Provide real, fixed-hour, manual, and hour-sweep sources for running
//!   and testing the board.
//!
//! # Invariants
//! - Sources never fail; every call yields a timestamp.

use crate::model::row::HOURS_PER_DAY;
use crate::model::timestamp::Timestamp;
use std::cell::Cell;
use std::rc::Rc;

/// Producer of the "current" timestamp.
pub trait TimeSource {
    fn now(&self) -> Timestamp;
}

impl<F> TimeSource for F
where
    F: Fn() -> Timestamp,
{
    fn now(&self) -> Timestamp {
        self()
    }
}

/// True local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::now_local()
    }
}

/// Wall-clock time with the hour pinned, for previewing the board at a given
/// hour of the day.
#[derive(Debug, Clone, Copy)]
pub struct FixedHourSource {
    hour: u32,
}

impl FixedHourSource {
    /// Returns `None` when `hour` is not a valid hour of day.
    pub fn new(hour: u32) -> Option<Self> {
        (hour < HOURS_PER_DAY).then_some(Self { hour })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

impl TimeSource for FixedHourSource {
    fn now(&self) -> Timestamp {
        let now = Timestamp::now_local();
        now.with_hour(self.hour).unwrap_or(now)
    }
}

/// Simulation source: every read reports the next hour of the day, so one
/// tick per second walks the whole day in 24 seconds.
#[derive(Debug)]
pub struct HourSweepSource {
    next_hour: Cell<u32>,
}

impl HourSweepSource {
    pub fn starting_at(hour: u32) -> Self {
        Self {
            next_hour: Cell::new(hour % HOURS_PER_DAY),
        }
    }
}

impl TimeSource for HourSweepSource {
    fn now(&self) -> Timestamp {
        let hour = self.next_hour.get();
        self.next_hour.set((hour + 1) % HOURS_PER_DAY);
        let now = Timestamp::now_local();
        now.with_hour(hour).unwrap_or(now)
    }
}

/// Deterministic clock controlled by the caller.
///
/// Clones share the same instant, so a test can keep one handle while the
/// clock driver owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
        }
    }

    pub fn get(&self) -> Timestamp {
        self.current.get()
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.current.set(timestamp);
    }

    /// Moves the clock by `seconds`; negative values move it backwards.
    pub fn advance(&self, seconds: i64) -> Timestamp {
        let next = self.current.get().plus_seconds(seconds);
        self.current.set(next);
        next
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedHourSource, HourSweepSource, ManualClock, TimeSource};
    use crate::model::timestamp::Timestamp;

    #[test]
    fn fixed_hour_rejects_invalid_hour() {
        assert!(FixedHourSource::new(24).is_none());
        let source = FixedHourSource::new(9).unwrap();
        assert_eq!(source.now().hour(), 9);
    }

    #[test]
    fn hour_sweep_wraps_after_midnight() {
        let source = HourSweepSource::starting_at(22);
        let hours: Vec<u32> = (0..4).map(|_| source.now().hour()).collect();
        assert_eq!(hours, vec![22, 23, 0, 1]);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Timestamp::from_ymd_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();
        handle.advance(3600);
        assert_eq!(clock.now().hour(), 9);
    }

    #[test]
    fn closures_are_time_sources() {
        let fixed = Timestamp::from_ymd_hms(2026, 10, 16, 17, 30, 0).unwrap();
        let source = move || fixed;
        assert_eq!(source.now(), fixed);
    }
}
