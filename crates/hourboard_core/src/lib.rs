//! Core engine for the hourly schedule board.
//! This crate is the single source of truth for row time-gating, note
//! persistence, and midnight reset invariants.

pub mod board;
pub mod clock;
pub mod config;
pub mod db;
pub mod event;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod store;

pub use board::registry::{RegistryError, RowRegistry};
pub use board::row::{BoardRow, RowSnapshot, SharedRow};
pub use board::row_state::{update_row_time_state, TimeTransition};
pub use board::session::{BoardError, EditOutcome, SaveOutcome, ScheduleBoard};
pub use board::view::{
    BoardSurface, HeadlessRowState, HeadlessRowView, HeadlessSurface, HeadlessTimeDisplay,
    RowView, TimeDisplay,
};
pub use clock::driver::{ClockDriver, ClockStopHandle, DEFAULT_TICK_INTERVAL};
pub use clock::source::{
    FixedHourSource, HourSweepSource, ManualClock, SystemTimeSource, TimeSource,
};
pub use config::{BoardConfig, ConfigError};
pub use event::bus::{EventBus, TimeBus};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::row::{
    ClockHour, Meridiem, RowMetadata, RowValidationError, SaveTriggerId, HOURS_PER_DAY,
};
pub use model::time_state::{derive_time_state, TimeState};
pub use model::timestamp::Timestamp;
pub use persistence::{SavedTasks, TaskPersistence, DEFAULT_STORAGE_KEY};
pub use store::{InMemoryStore, KeyValueStore, SqliteKvStore, StoreError, StoreResult};
