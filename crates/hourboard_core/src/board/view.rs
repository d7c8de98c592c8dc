//! Rendering seams between the board core and a UI layer.
//!
//! # Responsibility
//! - Define the per-row capabilities the state machine and sync drive.
//! - Provide a headless surface that records what would be rendered.

use crate::model::row::RowMetadata;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Addressable element for one hour row.
pub trait RowView {
    fn add_marker(&mut self, marker: &str);
    fn remove_marker(&mut self, marker: &str);
    fn set_disabled(&mut self, disabled: bool);
    fn set_text(&mut self, text: &str);
}

/// Global "current time" text, refreshed every tick.
pub trait TimeDisplay {
    fn show_time(&mut self, label: &str);
}

/// Factory for the board's elements, called once per row during open.
pub trait BoardSurface {
    fn create_row_view(&mut self, row: &RowMetadata) -> Box<dyn RowView>;
    fn create_time_display(&mut self) -> Box<dyn TimeDisplay>;
}

/// Everything a headless row view has been told so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessRowState {
    pub markers: BTreeSet<String>,
    pub disabled: bool,
    pub text: String,
    /// Count of `add_marker` plus `remove_marker` calls.
    pub marker_ops: u32,
}

/// Recording row view. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRowView {
    state: Rc<RefCell<HeadlessRowState>>,
}

impl HeadlessRowView {
    pub fn state(&self) -> HeadlessRowState {
        self.state.borrow().clone()
    }
}

impl RowView for HeadlessRowView {
    fn add_marker(&mut self, marker: &str) {
        let mut state = self.state.borrow_mut();
        state.markers.insert(marker.to_string());
        state.marker_ops += 1;
    }

    fn remove_marker(&mut self, marker: &str) {
        let mut state = self.state.borrow_mut();
        state.markers.remove(marker);
        state.marker_ops += 1;
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    fn set_text(&mut self, text: &str) {
        self.state.borrow_mut().text = text.to_string();
    }
}

/// Recording time display. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessTimeDisplay {
    shown: Rc<RefCell<Vec<String>>>,
}

impl HeadlessTimeDisplay {
    pub fn latest(&self) -> Option<String> {
        self.shown.borrow().last().cloned()
    }

    pub fn updates(&self) -> usize {
        self.shown.borrow().len()
    }
}

impl TimeDisplay for HeadlessTimeDisplay {
    fn show_time(&mut self, label: &str) {
        self.shown.borrow_mut().push(label.to_string());
    }
}

/// Surface keeping a handle to every view it created, indexed by hour.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    rows: Vec<HeadlessRowView>,
    display: HeadlessTimeDisplay,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, hour: u32) -> Option<&HeadlessRowView> {
        self.rows.get(usize::try_from(hour).ok()?)
    }

    pub fn display(&self) -> &HeadlessTimeDisplay {
        &self.display
    }
}

impl BoardSurface for HeadlessSurface {
    fn create_row_view(&mut self, _row: &RowMetadata) -> Box<dyn RowView> {
        let view = HeadlessRowView::default();
        self.rows.push(view.clone());
        Box::new(view)
    }

    fn create_time_display(&mut self) -> Box<dyn TimeDisplay> {
        Box::new(self.display.clone())
    }
}
