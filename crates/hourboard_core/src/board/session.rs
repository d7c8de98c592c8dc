//! Board session: rows, registry, persistence, and clock wired together.
//!
//! # Responsibility
//! - Bootstrap the board: load saved notes, build 24 rows, subscribe them to
//!   the clock, and deliver the initial tick.
//! - Route edit and save actions through the row registry.
//! - Reset saved notes on the exact-midnight tick before any row observes it.
//!
//! # Invariants
//! - The rollover check is the privileged subscriber; rows are ordinary
//!   subscribers in ascending hour order.
//! - Saves and edits for rows in `TimeState::Before` are refused without
//!   touching the store.
//! - A failed rollover reset leaves row text untouched so the display stays
//!   consistent with the store.
//! - The session is single-threaded (`!Send`); only the clock stop handle
//!   crosses threads.

use crate::board::registry::{RegistryError, RowRegistry};
use crate::board::row::{BoardRow, RowSnapshot};
use crate::board::view::{BoardSurface, TimeDisplay};
use crate::clock::driver::{ClockDriver, ClockStopHandle};
use crate::clock::source::TimeSource;
use crate::config::{BoardConfig, ConfigError};
use crate::model::row::{RowMetadata, RowValidationError, SaveTriggerId, HOURS_PER_DAY};
use crate::model::timestamp::Timestamp;
use crate::persistence::TaskPersistence;
use crate::store::{KeyValueStore, StoreError};
use log::{debug, error, info};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Board bootstrap and action errors.
#[derive(Debug)]
pub enum BoardError {
    Config(ConfigError),
    Store(StoreError),
    Row(RowValidationError),
    Registry(RegistryError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid board config: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Row(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Row(err) => Some(err),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BoardError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RowValidationError> for BoardError {
    fn from(value: RowValidationError) -> Self {
        Self::Row(value)
    }
}

impl From<RegistryError> for BoardError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Result of a save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Row hour already passed; the store was not touched.
    Locked,
    /// Trigger is not registered; nothing happened.
    UnknownRow,
}

/// Result of editing a row's note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Locked,
    UnknownRow,
}

#[derive(Debug, Default)]
struct TickStatus {
    latest: Option<Timestamp>,
    rollovers: u64,
    failed_resets: u64,
}

/// One running schedule board.
pub struct ScheduleBoard<K: KeyValueStore + 'static> {
    persistence: Rc<TaskPersistence<K>>,
    registry: Rc<RefCell<RowRegistry>>,
    clock: ClockDriver,
    status: Rc<RefCell<TickStatus>>,
}

impl<K: KeyValueStore + 'static> ScheduleBoard<K> {
    /// Builds the board and delivers the initial tick.
    ///
    /// # Errors
    /// - Invalid `config`.
    /// - Store failure while loading saved notes.
    pub fn open(
        store: K,
        source: Box<dyn TimeSource>,
        surface: &mut dyn BoardSurface,
        config: &BoardConfig,
    ) -> Result<Self, BoardError> {
        config.validate()?;
        let persistence = Rc::new(TaskPersistence::with_key(
            store,
            config.storage_key.clone(),
        ));
        let saved = persistence.load()?;

        let mut clock = ClockDriver::new(source, config.tick_interval);
        let registry = Rc::new(RefCell::new(RowRegistry::new()));
        for hour in 0..HOURS_PER_DAY {
            let text = saved.get(&hour).cloned().unwrap_or_default();
            let meta = RowMetadata::new(hour, text)?;
            let view = surface.create_row_view(&meta);
            let row = Rc::new(RefCell::new(BoardRow::new(meta, view)));
            registry.borrow_mut().register(Rc::clone(&row))?;
            clock.bus_mut().subscribe(move |now: &Timestamp| {
                row.borrow_mut().observe(now);
            });
        }

        let status = Rc::new(RefCell::new(TickStatus::default()));
        clock.bus_mut().subscribe_privileged(rollover_listener(
            Rc::clone(&persistence),
            Rc::clone(&registry),
            Rc::clone(&status),
            surface.create_time_display(),
        ));

        let mut board = Self {
            persistence,
            registry,
            clock,
            status,
        };
        let first = board.clock.start();
        info!(
            "event=board_open module=board status=ok rows={} saved_rows={} at={}",
            board.registry.borrow().len(),
            saved.len(),
            first
        );
        Ok(board)
    }

    /// Publishes one tick immediately.
    pub fn tick(&mut self) -> Timestamp {
        self.clock.tick()
    }

    /// Runs the heartbeat loop; see [`ClockDriver::run`].
    pub fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        self.clock.run(max_ticks)
    }

    pub fn stop_handle(&self) -> ClockStopHandle {
        self.clock.stop_handle()
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    pub fn trigger_for_hour(&self, hour: u32) -> Option<SaveTriggerId> {
        self.registry.borrow().trigger_for_hour(hour)
    }

    /// Replaces the note text of the row owning `trigger`.
    pub fn edit_note(&self, trigger: SaveTriggerId, text: impl Into<String>) -> EditOutcome {
        let Some(row) = self.registry.borrow().get(trigger) else {
            debug!("event=row_edit module=board status=skipped reason=unknown_row");
            return EditOutcome::UnknownRow;
        };
        let mut row = row.borrow_mut();
        if row.meta().is_locked() {
            debug!(
                "event=row_edit module=board status=skipped reason=locked row={}",
                row.meta().row_index()
            );
            return EditOutcome::Locked;
        }
        row.replace_note(text);
        EditOutcome::Applied
    }

    /// Writes the current note of the row owning `trigger` to the store.
    ///
    /// Unknown triggers and locked rows are no-ops, reported via the outcome.
    pub fn save(&self, trigger: SaveTriggerId) -> Result<SaveOutcome, BoardError> {
        let Some(row) = self.registry.borrow().get(trigger) else {
            debug!("event=row_save module=board status=skipped reason=unknown_row");
            return Ok(SaveOutcome::UnknownRow);
        };
        let row = row.borrow();
        let meta = row.meta();
        if meta.is_locked() {
            debug!(
                "event=row_save module=board status=skipped reason=locked row={}",
                meta.row_index()
            );
            return Ok(SaveOutcome::Locked);
        }
        self.persistence.save(meta.row_index(), meta.note_text())?;
        Ok(SaveOutcome::Saved)
    }

    pub fn snapshot(&self, hour: u32) -> Option<RowSnapshot> {
        let row = self.registry.borrow().get_by_hour(hour)?;
        let snapshot = row.borrow().snapshot();
        Some(snapshot)
    }

    /// Snapshots of every row in ascending hour order.
    pub fn snapshots(&self) -> Vec<RowSnapshot> {
        self.registry
            .borrow()
            .iter()
            .map(|row| row.borrow().snapshot())
            .collect()
    }

    pub fn latest_time(&self) -> Option<Timestamp> {
        self.status.borrow().latest
    }

    pub fn latest_time_label(&self) -> Option<String> {
        self.latest_time().map(|now| now.display_label())
    }

    /// Number of successful midnight resets since open.
    pub fn rollover_count(&self) -> u64 {
        self.status.borrow().rollovers
    }

    pub fn failed_reset_count(&self) -> u64 {
        self.status.borrow().failed_resets
    }

    pub fn persistence(&self) -> &TaskPersistence<K> {
        &self.persistence
    }
}

fn rollover_listener<K: KeyValueStore + 'static>(
    persistence: Rc<TaskPersistence<K>>,
    registry: Rc<RefCell<RowRegistry>>,
    status: Rc<RefCell<TickStatus>>,
    mut display: Box<dyn TimeDisplay>,
) -> impl FnMut(&Timestamp) + 'static {
    move |now: &Timestamp| {
        display.show_time(&now.display_label());
        status.borrow_mut().latest = Some(*now);
        if !now.is_day_rollover() {
            return;
        }

        match persistence.reset_all() {
            Ok(()) => {
                for row in registry.borrow().iter() {
                    row.borrow_mut().clear_note();
                }
                status.borrow_mut().rollovers += 1;
                info!("event=day_rollover module=board status=ok at={now}");
            }
            Err(err) => {
                status.borrow_mut().failed_resets += 1;
                error!("event=day_rollover module=board status=error at={now} error={err}");
            }
        }
    }
}
