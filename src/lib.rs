//! # Trellis
//!
//! A page-native table layout engine.
//!
//! Trellis takes a table whose cell content has already been measured and
//! produces positioned geometry for every wrapper, row group, row and cell,
//! one fragment per page. Column widths are resolved once for the whole
//! table, so columns line up across pages, and the header and footer row
//! groups repeat on every page the table touches.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]      — Table tree: groups, rows, cells, measured content
//!       ↓
//!   [style]      — Resolve table properties and defaults
//!       ↓
//!   [layout]     — Grid → columns → collapsed borders → rows → fragments
//!       ↓
//! Output (positioned fragments + warnings)
//! ```
//!
//! Layout is infallible. Malformed structure, such as a row with more cells
//! than the table has columns, is repaired and reported through a
//! [`diagnostics::WarningSink`] the caller supplies.

pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod model;
pub mod style;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::Serialize;

use diagnostics::{LayoutWarning, WarningSink};
use error::TableError;
use layout::{Constraints, Continuation, FragmentOutcome, TableFragment, TableLayoutEngine};
use model::{Document, Table};

/// Lay out one fragment of a table.
///
/// A pure function of its inputs: the grid, widths and heights are built
/// fresh on every call. Pass the previous fragment's continuation as
/// `resume` to get the next one.
pub fn layout_table(
    table: &Table,
    constraints: &Constraints,
    resume: Option<Continuation>,
    sink: &mut dyn WarningSink,
) -> FragmentOutcome {
    TableLayoutEngine::new(table, constraints.available_width, sink).fragment(constraints, resume)
}

/// Lay out a table across as many pages as it needs.
pub fn paginate_table(
    table: &Table,
    constraints: &Constraints,
    sink: &mut dyn WarningSink,
) -> Vec<TableFragment> {
    TableLayoutEngine::new(table, constraints.available_width, sink).paginate(constraints)
}

/// Lay out a document's table on its pages.
pub fn layout_document(document: &Document, sink: &mut dyn WarningSink) -> Vec<TableFragment> {
    let page = &document.page;
    let (width, height) = page.content_size();

    let mut constraints = if page.wrap {
        Constraints::paged(width, height)
    } else {
        Constraints::unbounded(width)
    }
    .at(page.margin.left, page.margin.top);

    if document.used_height > 0.0 {
        constraints.y += document.used_height;
        if page.wrap {
            constraints = constraints.with_remaining(height - document.used_height);
        }
    }

    paginate_table(&document.table, &constraints, sink)
}

/// Fragments plus every warning produced along the way.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayoutResult {
    pub fragments: Vec<TableFragment>,
    pub warnings: Vec<LayoutWarning>,
}

/// Lay out a document described as JSON.
pub fn layout_json(json: &str) -> Result<TableLayoutResult, TableError> {
    let document: Document = serde_json::from_str(json)?;
    let mut warnings: Vec<LayoutWarning> = Vec::new();
    let fragments = layout_document(&document, &mut warnings);
    Ok(TableLayoutResult {
        fragments,
        warnings,
    })
}
