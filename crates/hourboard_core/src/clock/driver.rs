//! Heartbeat that turns a time source into bus broadcasts.
//!
//! # Responsibility
//! - Publish exactly one timestamp per tick on the owned time bus.
//! - Deliver an initial timestamp synchronously on start.
//! - Run a sleep/tick loop until stopped.
//!
//! # Invariants
//! - Each `tick` or `start` call publishes exactly once.
//! - Ticks are not aligned to wall-clock second boundaries.

use crate::clock::source::{SystemTimeSource, TimeSource};
use crate::event::bus::TimeBus;
use crate::model::timestamp::Timestamp;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Thread-safe request to stop a running clock loop.
#[derive(Debug, Clone, Default)]
pub struct ClockStopHandle {
    stopped: Arc<AtomicBool>,
}

impl ClockStopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Process-wide clock heartbeat.
pub struct ClockDriver {
    source: Box<dyn TimeSource>,
    bus: TimeBus,
    interval: Duration,
    stop: ClockStopHandle,
    ticks: u64,
}

impl ClockDriver {
    pub fn new(source: Box<dyn TimeSource>, interval: Duration) -> Self {
        Self {
            source,
            bus: TimeBus::new(),
            interval,
            stop: ClockStopHandle::default(),
            ticks: 0,
        }
    }

    /// Driver reading real wall-clock time once per second.
    pub fn system() -> Self {
        Self::new(Box::new(SystemTimeSource), DEFAULT_TICK_INTERVAL)
    }

    pub fn bus_mut(&mut self) -> &mut TimeBus {
        &mut self.bus
    }

    /// Number of timestamps published so far, the initial one included.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn stop_handle(&self) -> ClockStopHandle {
        self.stop.clone()
    }

    /// Delivers the initial timestamp to every subscriber without waiting
    /// for the first interval.
    pub fn start(&mut self) -> Timestamp {
        let now = self.tick();
        info!(
            "event=clock_start module=clock status=ok at={} interval_ms={} subscribers={}",
            now,
            self.interval.as_millis(),
            self.bus.ordinary_count() + self.bus.privileged_count()
        );
        now
    }

    /// Reads the source once and publishes the result.
    pub fn tick(&mut self) -> Timestamp {
        let now = self.source.now();
        self.bus.publish(&now);
        self.ticks += 1;
        now
    }

    /// Sleeps one interval then ticks, until the stop handle fires or
    /// `max_ticks` ticks have been published by this call.
    ///
    /// Returns the number of ticks published by this call.
    pub fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        let mut published = 0;
        info!("event=clock_run module=clock status=start max_ticks={max_ticks:?}");
        while !self.stop.is_stopped() && max_ticks.map_or(true, |max| published < max) {
            std::thread::sleep(self.interval);
            if self.stop.is_stopped() {
                break;
            }
            let now = self.tick();
            published += 1;
            debug!("event=clock_tick module=clock status=ok at={now}");
        }
        info!("event=clock_run module=clock status=ok ticks={published}");
        published
    }
}
