//! A row's metadata paired with its rendered element.

use crate::board::row_state::{update_row_time_state, TimeTransition};
use crate::board::view::RowView;
use crate::model::row::RowMetadata;
use crate::model::time_state::TimeState;
use crate::model::timestamp::Timestamp;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Row handle shared between the registry and the row's tick subscriber.
pub type SharedRow = Rc<RefCell<BoardRow>>;

/// Read-only projection of one row for callers and renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSnapshot {
    pub row_index: u32,
    pub label: String,
    pub time_state: Option<TimeState>,
    pub note_text: String,
    pub locked: bool,
}

pub struct BoardRow {
    meta: RowMetadata,
    view: Box<dyn RowView>,
}

impl BoardRow {
    /// Pairs `meta` with `view` and pushes the initial note text to the view.
    pub fn new(meta: RowMetadata, mut view: Box<dyn RowView>) -> Self {
        view.set_text(meta.note_text());
        Self { meta, view }
    }

    pub fn meta(&self) -> &RowMetadata {
        &self.meta
    }

    /// Runs the time-state machine against `now`.
    pub fn observe(&mut self, now: &Timestamp) -> Option<TimeTransition> {
        update_row_time_state(&mut self.meta, self.view.as_mut(), now)
    }

    pub(crate) fn replace_note(&mut self, text: impl Into<String>) {
        self.meta.set_note_text(text);
        self.view.set_text(self.meta.note_text());
    }

    /// Clears note text only; the time state is left as is.
    pub(crate) fn clear_note(&mut self) {
        self.meta.clear_note_text();
        self.view.set_text("");
    }

    pub fn snapshot(&self) -> RowSnapshot {
        RowSnapshot {
            row_index: self.meta.row_index(),
            label: self.meta.clock_hour().label(),
            time_state: self.meta.current_time_state(),
            note_text: self.meta.note_text().to_string(),
            locked: self.meta.is_locked(),
        }
    }
}
