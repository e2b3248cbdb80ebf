//! # Layout Diagnostics
//!
//! Recoverable problems found while laying out a table. Layout never fails
//! on malformed structure; it repairs the tree and reports what it did
//! through a [`WarningSink`] supplied by the caller.

use std::fmt;

use serde::Serialize;

/// A recoverable problem found during layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LayoutWarning {
    /// A row supplied more cells than the table has columns. The excess
    /// cells were dropped and do not appear in the grid.
    ExcessCells {
        /// Source index of the row group.
        row_group: usize,
        /// Index of the row inside its group.
        row: usize,
        /// How many cells were dropped.
        ignored: usize,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::ExcessCells { ignored, .. } => write!(
                f,
                "This table row has more columns than the table, ignored {} cell(s)",
                ignored
            ),
        }
    }
}

/// Receives warnings as layout produces them.
pub trait WarningSink {
    fn warn(&mut self, warning: LayoutWarning);
}

/// Collects warnings in order.
impl WarningSink for Vec<LayoutWarning> {
    fn warn(&mut self, warning: LayoutWarning) {
        self.push(warning);
    }
}

/// Forwards warnings to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&mut self, warning: LayoutWarning) {
        log::warn!(target: "trellis::table", "{}", warning);
    }
}

/// Discards warnings. Used for probing layouts whose warnings were
/// already reported, such as nested tables measured more than once.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&mut self, _warning: LayoutWarning) {}
}
