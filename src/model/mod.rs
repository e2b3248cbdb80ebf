//! # Document Model
//!
//! The input representation for the table layout engine. A document is a
//! single table plus the page it is laid out on. The table tree mirrors the
//! HTML table model: captions, column groups with columns, and row groups
//! with rows and cells.
//!
//! Cell content is opaque to the engine. The block/inline layout that owns
//! the content measures it up front and hands over its minimum and maximum
//! content widths, its height, and its first baseline. A cell may also hold
//! another table, which re-enters the same pipeline.

use crate::style::{CaptionSide, Style};
use serde::{Deserialize, Serialize};

/// A complete layout request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The table to lay out.
    pub table: Table,

    /// Page the table flows into.
    #[serde(default)]
    pub page: PageConfig,

    /// Height already taken on the first page by content above the table.
    #[serde(default)]
    pub used_height: f64,
}

/// Configuration for a page: size, margins, pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default)]
    pub margin: Edges,

    /// Whether a table that overflows continues on following pages.
    #[serde(default = "default_true")]
    pub wrap: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Edges::uniform(54.0), // ~0.75 inch
            wrap: true,
        }
    }
}

impl PageConfig {
    /// Width and height of the area inside the margins.
    pub fn content_size(&self) -> (f64, f64) {
        let (w, h) = self.size.dimensions();
        (
            (w - self.margin.horizontal()).max(0.0),
            (h - self.margin.vertical()).max(0.0),
        )
    }
}

fn default_true() -> bool {
    true
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for padding, borders and
/// resolved margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A table box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub captions: Vec<Caption>,

    /// Column groups in source order. Loose columns go in a group of their own.
    #[serde(default)]
    pub column_groups: Vec<ColumnGroup>,

    #[serde(default)]
    pub row_groups: Vec<RowGroup>,

    /// A unique identifier (optional, echoed in the output).
    #[serde(default)]
    pub id: Option<String>,
}

/// A caption, pre-measured by the block layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    #[serde(default)]
    pub side: CaptionSide,
    /// Border-box height of the laid-out caption.
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub id: Option<String>,
}

/// A `<colgroup>`. When it has no columns, it stands for `span` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroup {
    #[serde(default)]
    pub style: Style,
    #[serde(default = "default_one")]
    pub span: u32,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub id: Option<String>,
}

impl ColumnGroup {
    /// Number of grid columns this group stands for.
    pub fn column_count(&self) -> usize {
        if self.columns.is_empty() {
            self.span.max(1) as usize
        } else {
            self.columns.iter().map(|c| c.span.max(1) as usize).sum()
        }
    }
}

/// A `<col>`. Columns own no content, only constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub style: Style,
    #[serde(default = "default_one")]
    pub span: u32,
    #[serde(default)]
    pub id: Option<String>,
}

/// Role of a row group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowGroupRole {
    /// Repeated at the top of every fragment.
    Header,
    #[default]
    Body,
    /// Repeated at the bottom of every fragment.
    Footer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowGroup {
    #[serde(default)]
    pub role: RowGroupRole,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub style: Style,
    /// Column span, at least 1.
    #[serde(default = "default_one")]
    pub colspan: u32,
    /// Row span. 0 spans to the end of the row group.
    #[serde(default = "default_one")]
    pub rowspan: u32,
    #[serde(default)]
    pub content: CellContent,
    #[serde(default)]
    pub id: Option<String>,
}

fn default_one() -> u32 {
    1
}

/// What a cell contains, as far as table layout is concerned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CellContent {
    /// Nothing. The cell still occupies its slots.
    #[default]
    Empty,
    /// Block content measured by the block/inline layout.
    Block(ContentMeasure),
    /// A nested table.
    Table(Box<Table>),
}

/// Measurements of a cell's content box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeasure {
    /// Narrowest width without overflow (longest unbreakable run).
    #[serde(default)]
    pub min_width: f64,
    /// Width with no line wrapping.
    #[serde(default)]
    pub max_width: f64,
    /// Laid-out content height.
    #[serde(default)]
    pub height: f64,
    /// First-line baseline from the content top, if the content has lines.
    #[serde(default)]
    pub baseline: Option<f64>,
}

impl Table {
    pub fn new(row_groups: Vec<RowGroup>) -> Self {
        Self {
            row_groups,
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_columns(mut self, column_groups: Vec<ColumnGroup>) -> Self {
        self.column_groups = column_groups;
        self
    }

    pub fn with_captions(mut self, captions: Vec<Caption>) -> Self {
        self.captions = captions;
        self
    }
}

impl ColumnGroup {
    /// A group holding the given columns.
    pub fn new(style: Style, columns: Vec<Column>) -> Self {
        Self {
            style,
            span: 1,
            columns,
            id: None,
        }
    }

    /// A group standing for `span` anonymous columns.
    pub fn spanning(style: Style, span: u32) -> Self {
        Self {
            style,
            span,
            columns: vec![],
            id: None,
        }
    }
}

impl Column {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            span: 1,
            id: None,
        }
    }
}

impl RowGroup {
    pub fn body(rows: Vec<Row>) -> Self {
        Self::with_role(RowGroupRole::Body, rows)
    }

    pub fn header(rows: Vec<Row>) -> Self {
        Self::with_role(RowGroupRole::Header, rows)
    }

    pub fn footer(rows: Vec<Row>) -> Self {
        Self::with_role(RowGroupRole::Footer, rows)
    }

    pub fn with_role(role: RowGroupRole, rows: Vec<Row>) -> Self {
        Self {
            role,
            style: Style::default(),
            rows,
            id: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Self {
            style: Style::default(),
            colspan: 1,
            rowspan: 1,
            content,
            id: None,
        }
    }

    /// An empty cell.
    pub fn empty() -> Self {
        Self::new(CellContent::Empty)
    }

    /// A cell with measured block content and no baseline.
    pub fn block(min_width: f64, max_width: f64, height: f64) -> Self {
        Self::new(CellContent::Block(ContentMeasure {
            min_width,
            max_width,
            height,
            baseline: None,
        }))
    }

    /// A cell wrapping a nested table.
    pub fn table(table: Table) -> Self {
        Self::new(CellContent::Table(Box::new(table)))
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_span(mut self, colspan: u32, rowspan: u32) -> Self {
        self.colspan = colspan;
        self.rowspan = rowspan;
        self
    }
}
