//! Save-trigger identity to row mapping.
//!
//! # Responsibility
//! - Resolve which row a save action belongs to.
//! - Keep rows in creation order for reset and rendering passes.
//!
//! # Invariants
//! - One entry per row; trigger ids and hours are never duplicated.
//! - Entries are never removed.

use crate::board::row::SharedRow;
use crate::model::row::SaveTriggerId;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateTrigger(SaveTriggerId),
    DuplicateHour(u32),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTrigger(id) => write!(f, "save trigger already registered: {id}"),
            Self::DuplicateHour(hour) => write!(f, "row for hour {hour} already registered"),
        }
    }
}

impl Error for RegistryError {}

/// Row lookup table owned by the board session.
#[derive(Default)]
pub struct RowRegistry {
    rows: Vec<SharedRow>,
    by_trigger: HashMap<SaveTriggerId, usize>,
    by_hour: BTreeMap<u32, usize>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, row: SharedRow) -> Result<(), RegistryError> {
        let (trigger, hour) = {
            let row = row.borrow();
            (row.meta().save_trigger(), row.meta().row_index())
        };
        if self.by_trigger.contains_key(&trigger) {
            return Err(RegistryError::DuplicateTrigger(trigger));
        }
        if self.by_hour.contains_key(&hour) {
            return Err(RegistryError::DuplicateHour(hour));
        }

        let position = self.rows.len();
        self.rows.push(row);
        self.by_trigger.insert(trigger, position);
        self.by_hour.insert(hour, position);
        Ok(())
    }

    pub fn get(&self, trigger: SaveTriggerId) -> Option<SharedRow> {
        let position = *self.by_trigger.get(&trigger)?;
        self.rows.get(position).map(Rc::clone)
    }

    pub fn get_by_hour(&self, hour: u32) -> Option<SharedRow> {
        let position = *self.by_hour.get(&hour)?;
        self.rows.get(position).map(Rc::clone)
    }

    pub fn trigger_for_hour(&self, hour: u32) -> Option<SaveTriggerId> {
        let row = self.get_by_hour(hour)?;
        let trigger = row.borrow().meta().save_trigger();
        Some(trigger)
    }

    /// Rows in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
