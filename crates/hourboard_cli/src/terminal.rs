//! Terminal rendering of the board.
//!
//! # Responsibility
//! - Implement the core rendering seams on stdout.
//! - Print full-board tables and JSON reports from row snapshots.

use hourboard_core::{
    BoardSurface, RowMetadata, RowSnapshot, RowView, TimeDisplay, TimeState, Timestamp,
};
use serde_json::json;
use std::io::Write;

/// Surface whose row views announce state changes when `live` is set.
pub struct TerminalSurface {
    live: bool,
}

impl TerminalSurface {
    /// Quiet surface for one-shot commands; rendering happens via snapshots.
    pub fn quiet() -> Self {
        Self { live: false }
    }

    /// Surface that prints every marker change and clock update.
    pub fn live() -> Self {
        Self { live: true }
    }
}

impl BoardSurface for TerminalSurface {
    fn create_row_view(&mut self, row: &RowMetadata) -> Box<dyn RowView> {
        Box::new(TerminalRowView {
            label: row.clock_hour().label(),
            live: self.live,
        })
    }

    fn create_time_display(&mut self) -> Box<dyn TimeDisplay> {
        Box::new(TerminalClock { live: self.live })
    }
}

struct TerminalRowView {
    label: String,
    live: bool,
}

impl RowView for TerminalRowView {
    fn add_marker(&mut self, marker: &str) {
        if self.live {
            println!("  {:>4}  -> {}", self.label, marker);
        }
    }

    fn remove_marker(&mut self, _marker: &str) {}

    fn set_disabled(&mut self, disabled: bool) {
        if self.live && disabled {
            println!("  {:>4}  locked", self.label);
        }
    }

    fn set_text(&mut self, text: &str) {
        if self.live && text.is_empty() {
            println!("  {:>4}  cleared", self.label);
        }
    }
}

struct TerminalClock {
    live: bool,
}

impl TimeDisplay for TerminalClock {
    fn show_time(&mut self, label: &str) {
        if self.live {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "[{label}]");
            let _ = out.flush();
        }
    }
}

/// Prints one line per row: label, state, lock flag, and note text.
pub fn print_board(time_label: Option<&str>, rows: &[RowSnapshot]) {
    if let Some(label) = time_label {
        println!("{label}");
    }
    for row in rows {
        let state = row.time_state.map_or("-", TimeState::as_str);
        let lock = if row.locked { "locked" } else { "" };
        println!("{:>4}  {:<7}  {:<6}  {}", row.label, state, lock, row.note_text);
    }
}

/// Prints `{"at": ..., "rows": [...]}` on one line.
pub fn print_board_json(at: Option<Timestamp>, rows: &[RowSnapshot]) -> serde_json::Result<()> {
    println!("{}", board_json(at, rows)?);
    Ok(())
}

fn board_json(at: Option<Timestamp>, rows: &[RowSnapshot]) -> serde_json::Result<String> {
    serde_json::to_string(&json!({ "at": at, "rows": rows }))
}
