//! # Table Layout Engine
//!
//! Turns a [`Table`] into positioned fragments, one per page.
//!
//! ## Pipeline
//!
//! Everything that does not depend on page breaks is resolved once, up
//! front, for the whole table:
//!
//! 1. **Grid**: row groups are reordered (header, bodies, footer) and cells
//!    are placed into a row/column occupancy grid ([`grid`]).
//! 2. **Borders**: in the collapsing model every grid edge picks a winning
//!    border and each side takes half of it ([`borders`]).
//! 3. **Columns**: fixed or auto layout assigns every column a width
//!    ([`columns`], [`distribute`]).
//! 4. **Rows**: row heights and vertical alignment inside each row
//!    ([`rows`]). Nested tables are laid out here, unpaginated, at the
//!    width their cell ended up with.
//!
//! Pagination then only moves rows around. A fragment is a run of body rows
//! between the repeated header and footer, chosen by [`page_break`]. Widths
//! never change between fragments, so a table's columns line up across
//! pages.
//!
//! ## Coordinates
//!
//! Every `x`/`y` is absolute and points at the top-left corner of a box's
//! border box. Rows are never split: a fragment either holds a row or it
//! does not. A cell spanning several rows belongs to the row it starts in
//! and keeps its full height even when a page break falls inside the span.

pub mod borders;
pub mod columns;
pub mod distribute;
pub mod grid;
pub mod page_break;
pub mod rows;
pub mod wrapper;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{NullSink, WarningSink};
use crate::model::{Cell, CellContent, Edges, RowGroupRole, Table};
use crate::style::{
    BorderSide, BorderSpacing, BreakInside, CaptionSide, Dimension, EdgeValues, LayoutMode,
    ResolvedStyle, VerticalAlign,
};

use self::borders::{collapse_borders, CollapsedBorders};
use self::columns::{
    auto_layout, cell_bounds, column_x_offset, fixed_layout, spacing_total, span_width,
    used_table_width, CellSpec, ColumnIntrinsics, ColumnSpec,
};
use self::grid::{build_grid, fixed_column_count, ColumnSource, Grid, GridCell, Section};
use self::page_break::{decide_break, BodyGroup, BreakDecision, FragmentPlan, FragmentSpace, Resume};
use self::rows::{resolve_rows, CellBlock, RowMetrics};

// ── Inputs ──────────────────────────────────────────────────────

/// Space the surrounding layout offers a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    /// Left edge of the containing block.
    pub x: f64,
    /// Where the table's margin box starts.
    pub y: f64,
    /// Width of the containing block.
    pub available_width: f64,
    /// Block space left on the current page. `None` means the table starts
    /// at the top of an empty page.
    pub remaining_height: Option<f64>,
    /// Content height of a page. `None` disables pagination.
    pub page_height: Option<f64>,
    /// Where content starts on a fresh page.
    pub page_top: f64,
}

impl Constraints {
    /// A single fragment with no height limit.
    pub fn unbounded(available_width: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            available_width,
            remaining_height: None,
            page_height: None,
            page_top: 0.0,
        }
    }

    /// Top of an empty page of the given content height.
    pub fn paged(available_width: f64, page_height: f64) -> Self {
        Self {
            page_height: Some(page_height.max(0.0)),
            ..Self::unbounded(available_width)
        }
    }

    /// Move the table's origin. The page top follows `y`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self.page_top = y;
        self
    }

    /// Part of the current page is already taken.
    pub fn with_remaining(mut self, remaining_height: f64) -> Self {
        self.remaining_height = Some(remaining_height.max(0.0));
        self
    }

    /// The same column on the next page.
    pub fn next_page(&self) -> Self {
        Self {
            y: self.page_top,
            remaining_height: None,
            ..*self
        }
    }
}

/// Where the next fragment of a table resumes: a source row group and the
/// row inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    pub row_group: usize,
    pub row: usize,
}

/// Result of laying out one fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentOutcome {
    Placed(TableFragment),
    /// Nothing fits in what is left of this page. The table starts over
    /// on the next one.
    Deferred,
}

// ── Output geometry ─────────────────────────────────────────────

/// Position and box metrics of a laid-out box. `x`, `y`, `width` and
/// `height` describe the border box; margins lie outside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub padding: Edges,
    pub border: Edges,
    pub margin: Edges,
}

impl BoxGeometry {
    pub fn content_x(&self) -> f64 {
        self.x + self.border.left + self.padding.left
    }

    pub fn content_y(&self) -> f64 {
        self.y + self.border.top + self.padding.top
    }

    pub fn content_width(&self) -> f64 {
        (self.width - self.border.horizontal() - self.padding.horizontal()).max(0.0)
    }

    pub fn content_height(&self) -> f64 {
        (self.height - self.border.vertical() - self.padding.vertical()).max(0.0)
    }

    pub fn margin_width(&self) -> f64 {
        self.width + self.margin.horizontal()
    }

    pub fn margin_height(&self) -> f64 {
        self.height + self.margin.vertical()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// One page's worth of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFragment {
    /// Page the fragment lands on, counted from the page the table started on.
    pub page_index: usize,
    /// The anonymous box holding captions and the table. Carries the margins.
    pub wrapper: BoxGeometry,
    pub table: BoxGeometry,
    pub captions: Vec<CaptionFragment>,
    pub column_widths: Vec<f64>,
    pub row_groups: Vec<RowGroupFragment>,
    /// Set on every fragment but the last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Continuation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl TableFragment {
    /// Baseline of the first row, if the fragment has rows.
    pub fn first_baseline(&self) -> Option<f64> {
        let row = self.row_groups.first()?.rows.first()?;
        Some(row.y + row.baseline)
    }

    /// Body rows in this fragment as (source row group, row) pairs.
    pub fn body_rows(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_groups
            .iter()
            .filter(|g| g.role == RowGroupRole::Body)
            .flat_map(|g| g.rows.iter().map(|r| (r.row_group, r.row)))
    }

    /// Shift the whole fragment, nested tables included.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.wrapper.translate(dx, dy);
        self.table.translate(dx, dy);
        for caption in &mut self.captions {
            caption.x += dx;
            caption.y += dy;
        }
        for group in &mut self.row_groups {
            group.x += dx;
            group.y += dy;
            for row in &mut group.rows {
                row.x += dx;
                row.y += dy;
                for cell in &mut row.cells {
                    cell.geometry.translate(dx, dy);
                    if let Some(nested) = cell.nested.as_mut() {
                        nested.translate(dx, dy);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionFragment {
    pub side: CaptionSide,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowGroupFragment {
    /// Source index of the row group.
    pub source: usize,
    pub role: RowGroupRole,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rows: Vec<RowFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFragment {
    pub row_group: usize,
    pub row: usize,
    pub grid_row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Baseline from the row top.
    pub baseline: f64,
    /// Cells that start in this row.
    pub cells: Vec<CellFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFragment {
    /// Index of the cell inside its source row.
    pub index: usize,
    pub grid_row: usize,
    pub column: usize,
    pub rowspan: usize,
    pub colspan: usize,
    /// Padding includes the space added by vertical alignment.
    pub geometry: BoxGeometry,
    pub vertical_align: VerticalAlign,
    /// Shift of the content inside a declared height taller than it.
    pub content_offset: f64,
    /// Baseline from the border-box top.
    pub baseline: f64,
    /// Winning borders, in the collapsing border model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<EdgeValues<BorderSide>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<TableFragment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// ── Preparation ─────────────────────────────────────────────────

/// The parts of a table that do not depend on the available width.
struct Prepared {
    style: ResolvedStyle,
    fixed: bool,
    spacing: BorderSpacing,
    grid: Grid,
    collapsed: Option<CollapsedBorders>,
    border: Edges,
    padding: Edges,
    cell_styles: Vec<ResolvedStyle>,
    cell_borders: Vec<Edges>,
    columns: Vec<ColumnSpec>,
    cells: Vec<CellSpec>,
}

impl Prepared {
    fn new(table: &Table, sink: &mut dyn WarningSink) -> Self {
        let style = table.style.resolve();
        // Fixed layout needs a table width to work with.
        let fixed = style.table_layout == LayoutMode::Fixed && !style.width.is_auto();
        let spacing = if style.is_collapsed() {
            BorderSpacing::default()
        } else {
            style.border_spacing
        };

        let grid = build_grid(table, fixed.then(|| fixed_column_count(table)), sink);
        let collapsed = style.is_collapsed().then(|| collapse_borders(table, &grid));
        let (border, padding) = match &collapsed {
            Some(c) => (c.table, Edges::default()),
            None => (style.border_widths(), style.padding),
        };

        let cell_styles: Vec<ResolvedStyle> = grid
            .cells
            .iter()
            .map(|c| source_cell(table, c).style.resolve())
            .collect();
        let cell_borders: Vec<Edges> = match &collapsed {
            Some(c) => c.cells.clone(),
            None => cell_styles.iter().map(|s| s.border_widths()).collect(),
        };

        let cells = grid
            .cells
            .iter()
            .zip(cell_styles.iter().zip(&cell_borders))
            .map(|(placed, (s, b))| {
                let extra = s.padding.horizontal() + b.horizontal();
                let (content_min, content_max) =
                    content_widths(&source_cell(table, placed).content);
                let (min, max) = cell_bounds(content_min, content_max, s.width, s.min_width, extra);
                CellSpec {
                    column: placed.column,
                    colspan: placed.colspan,
                    first_row: placed.grid_row == 0,
                    min,
                    max,
                    width: s.width,
                    extra,
                }
            })
            .collect();

        let columns = grid.columns.iter().map(|s| column_spec(table, s)).collect();

        Self {
            style,
            fixed,
            spacing,
            grid,
            collapsed,
            border,
            padding,
            cell_styles,
            cell_borders,
            columns,
            cells,
        }
    }

    fn chrome(&self) -> Edges {
        Edges {
            top: self.border.top + self.padding.top,
            right: self.border.right + self.padding.right,
            bottom: self.border.bottom + self.padding.bottom,
            left: self.border.left + self.padding.left,
        }
    }
}

fn source_cell<'t>(table: &'t Table, placed: &GridCell) -> &'t Cell {
    &table.row_groups[placed.row_group].rows[placed.row].cells[placed.cell]
}

fn column_spec(table: &Table, source: &Option<ColumnSource>) -> ColumnSpec {
    let Some(source) = source else {
        return ColumnSpec::default();
    };
    let group = &table.column_groups[source.group];
    ColumnSpec {
        width: source
            .column
            .and_then(|c| group.columns[c].style.width)
            .unwrap_or(Dimension::Auto),
        group_width: group.style.width.unwrap_or(Dimension::Auto),
    }
}

fn content_widths(content: &CellContent) -> (f64, f64) {
    match content {
        CellContent::Empty => (0.0, 0.0),
        CellContent::Block(measure) => (measure.min_width, measure.max_width),
        CellContent::Table(inner) => preferred_widths(inner),
    }
}

/// Outer min-content and max-content widths of a table, margins included.
/// This is what a shrink-to-fit container or an enclosing cell sees.
pub fn preferred_widths(table: &Table) -> (f64, f64) {
    let prepared = Prepared::new(table, &mut NullSink);
    let spacing = prepared.spacing.horizontal;
    let chrome = prepared.chrome().horizontal();
    let intrinsics = ColumnIntrinsics::compute(&prepared.columns, &prepared.cells, spacing);

    let mut min = intrinsics.table_min(spacing) + chrome;
    let mut max = intrinsics.table_max(spacing);
    if !max.is_finite() {
        max = intrinsics.max.iter().sum::<f64>() + spacing_total(intrinsics.len(), spacing);
    }
    max += chrome;

    let style = &prepared.style;
    if let Dimension::Pt(width) = style.width {
        min = width.max(min);
        max = min;
    }
    if let Some(cap) = style.max_width.points() {
        max = max.min(cap);
    }
    if let Some(floor) = style.min_width.points() {
        min = min.max(floor);
    }
    max = max.max(min);

    let margins =
        style.margin.left.points().unwrap_or(0.0) + style.margin.right.points().unwrap_or(0.0);
    (min + margins, max + margins)
}

// ── Engine ──────────────────────────────────────────────────────

/// Resolved geometry of one cell, position aside.
#[derive(Debug, Clone)]
struct ResolvedCell {
    width: f64,
    height: f64,
    padding: Edges,
    border: Edges,
    content_offset: f64,
    baseline: f64,
    align: VerticalAlign,
    /// Laid out with its wrapper at the origin.
    nested: Option<TableFragment>,
}

/// A table with its grid, column widths and row heights resolved, ready to
/// be cut into fragments.
pub struct TableLayoutEngine<'a> {
    table: &'a Table,
    prepared: Prepared,
    margin: Edges,
    captions: (f64, f64),
    column_widths: Vec<f64>,
    content_width: f64,
    explicit_content_height: f64,
    rows: Vec<RowMetrics>,
    cells: Vec<ResolvedCell>,
}

impl<'a> TableLayoutEngine<'a> {
    /// Resolve a table inside a containing block of `containing_width`.
    pub fn new(table: &'a Table, containing_width: f64, sink: &mut dyn WarningSink) -> Self {
        let prepared = Prepared::new(table, sink);
        let style = &prepared.style;
        let chrome = prepared.chrome();
        let spacing = prepared.spacing;

        // Table widths size the border box.
        let inner = |w: f64| (w - chrome.horizontal()).max(0.0);
        let specified = style.width.resolve(containing_width).map(inner);
        let min_width = style.min_width.resolve(containing_width).map(inner);
        let max_width = style.max_width.resolve(containing_width).map(inner);
        let available = inner(wrapper::available_width(&style.margin, containing_width));

        let (column_widths, content_width) = if prepared.fixed {
            let mut target = specified.unwrap_or(0.0);
            if let Some(cap) = max_width {
                target = target.min(cap);
            }
            if let Some(floor) = min_width {
                target = target.max(floor);
            }
            let result =
                fixed_layout(&prepared.columns, &prepared.cells, spacing.horizontal, target);
            (result.widths, result.table_width)
        } else {
            let intrinsics =
                ColumnIntrinsics::compute(&prepared.columns, &prepared.cells, spacing.horizontal);
            let width = used_table_width(
                intrinsics.table_min(spacing.horizontal),
                intrinsics.table_max(spacing.horizontal),
                specified,
                available,
                min_width,
                max_width,
            );
            (auto_layout(&intrinsics, spacing.horizontal, width), width)
        };

        let explicit_height = match style.height {
            Dimension::Pt(h) => Some((h - chrome.vertical()).max(0.0)),
            _ => None,
        };
        let row_heights: Vec<Option<f64>> = prepared
            .grid
            .rows
            .iter()
            .map(|r| match table.row_groups[r.row_group].rows[r.row].style.height {
                Some(Dimension::Pt(h)) => Some(h.max(0.0)),
                Some(Dimension::Percent(p)) => explicit_height.map(|h| h * p / 100.0),
                _ => None,
            })
            .collect();

        let mut blocks = Vec::with_capacity(prepared.grid.cells.len());
        let mut nested = Vec::with_capacity(prepared.grid.cells.len());
        for (i, placed) in prepared.grid.cells.iter().enumerate() {
            let s = &prepared.cell_styles[i];
            let b = prepared.cell_borders[i];
            let width =
                span_width(placed.column, placed.colspan, &column_widths, spacing.horizontal);
            let content_width = (width - s.padding.horizontal() - b.horizontal()).max(0.0);

            let (content_height, baseline, fragment) = match &source_cell(table, placed).content {
                CellContent::Empty => (0.0, None, None),
                CellContent::Block(measure) => (measure.height.max(0.0), measure.baseline, None),
                CellContent::Table(inner_table) => {
                    let fragment =
                        TableLayoutEngine::new(inner_table, content_width, sink).layout_unbounded();
                    (fragment.wrapper.margin_height(), fragment.first_baseline(), Some(fragment))
                }
            };

            blocks.push(CellBlock {
                grid_row: placed.grid_row,
                rowspan: placed.rowspan,
                content_height,
                specified_height: s.height.points(),
                baseline,
                padding_top: s.padding.top,
                padding_bottom: s.padding.bottom,
                border_top: b.top,
                border_bottom: b.bottom,
                align: s.vertical_align,
            });
            nested.push((width, fragment));
        }

        let (rows, placements) = resolve_rows(&row_heights, &blocks, spacing.vertical);
        let cells = blocks
            .iter()
            .zip(placements)
            .zip(nested)
            .zip(prepared.cell_styles.iter().zip(&prepared.cell_borders))
            .map(|(((block, placement), (width, fragment)), (s, border))| ResolvedCell {
                width,
                height: placement.border_height(block),
                padding: Edges {
                    top: placement.padding_top,
                    right: s.padding.right,
                    bottom: placement.padding_bottom,
                    left: s.padding.left,
                },
                border: *border,
                content_offset: placement.content_offset,
                baseline: placement.baseline,
                align: block.align,
                nested: fragment,
            })
            .collect();

        let table_width = content_width + chrome.horizontal();
        let margin = wrapper::used_margins(&style.margin, table_width, containing_width);
        let captions = wrapper::caption_heights(&table.captions);

        log::debug!(
            target: "trellis::table",
            "resolved {} rows x {} columns, content width {:.2}",
            rows.len(),
            column_widths.len(),
            content_width
        );

        Self {
            table,
            margin,
            captions,
            column_widths,
            content_width,
            explicit_content_height: explicit_height.unwrap_or(0.0),
            rows,
            cells,
            prepared,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.prepared.grid
    }

    /// Border-box widths of the grid columns.
    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    /// Width of the table's content box, spacing included.
    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    /// Resolved rows, positioned relative to the table's content box.
    pub fn rows(&self) -> &[RowMetrics] {
        &self.rows
    }

    /// Lay out the next fragment. `resume` is `None` for the first one.
    pub fn fragment(
        &self,
        constraints: &Constraints,
        resume: Option<Continuation>,
    ) -> FragmentOutcome {
        let first = resume.is_none();
        let start = self.resume_point(resume);
        let chrome = self.prepared.chrome();
        let spacing = self.prepared.spacing.vertical;

        let lead = if first { self.margin.top + self.captions.0 } else { 0.0 };
        let available = constraints.page_height.map(|page| {
            constraints.remaining_height.unwrap_or(page) - lead - chrome.vertical() - spacing
        });
        let space = FragmentSpace {
            available,
            page_is_empty: constraints.remaining_height.is_none(),
            trailing: self.captions.1 + self.margin.bottom,
        };

        let header = self.grid().header().and_then(|s| self.block_size(&s.rows));
        let footer = self.grid().footer().and_then(|s| self.block_size(&s.rows));
        let bodies: Vec<BodyGroup> = self
            .body_sections()
            .iter()
            .map(|s| BodyGroup {
                avoid_break: self.table.row_groups[s.source].style.break_inside
                    == Some(BreakInside::Avoid),
                rows: s.rows.clone().map(|r| self.rows[r].height + spacing).collect(),
            })
            .collect();

        let avoid_table = first && self.prepared.style.avoid_break_inside;
        match decide_break(header, footer, &bodies, start, space, avoid_table) {
            BreakDecision::MoveToNextPage => {
                log::debug!(
                    target: "trellis::table",
                    "table does not fit, moving to the next page"
                );
                FragmentOutcome::Deferred
            }
            BreakDecision::Place(plan) => {
                FragmentOutcome::Placed(self.build(constraints, &plan, first))
            }
        }
    }

    /// Lay out every fragment, starting on the current page.
    pub fn paginate(&self, constraints: &Constraints) -> Vec<TableFragment> {
        let mut fragments = Vec::new();
        let mut current = *constraints;
        let mut resume = None;
        let mut page_index = 0;

        loop {
            if let FragmentOutcome::Placed(mut fragment) = self.fragment(&current, resume) {
                fragment.page_index = page_index;
                let next = fragment.continuation;
                fragments.push(fragment);
                match next {
                    Some(next) => resume = Some(next),
                    None => break,
                }
            }
            page_index += 1;
            current = current.next_page();
        }

        log::debug!(target: "trellis::table", "table laid out in {} fragment(s)", fragments.len());
        fragments
    }

    /// The whole table as one fragment at the origin.
    fn layout_unbounded(&self) -> TableFragment {
        match self.fragment(&Constraints::unbounded(self.content_width), None) {
            FragmentOutcome::Placed(fragment) => fragment,
            FragmentOutcome::Deferred => TableFragment::default(),
        }
    }

    fn body_sections(&self) -> Vec<&Section> {
        self.grid().bodies().map(|(_, s)| s).collect()
    }

    /// Block space a run of rows consumes. `None` for an empty run.
    fn block_size(&self, rows: &Range<usize>) -> Option<f64> {
        if rows.is_empty() {
            return None;
        }
        let spacing = self.prepared.spacing.vertical;
        Some(rows.clone().map(|r| self.rows[r].height + spacing).sum())
    }

    fn resume_point(&self, resume: Option<Continuation>) -> Resume {
        let Some(resume) = resume else {
            return Resume::default();
        };
        let bodies = self.body_sections();
        match bodies.iter().position(|s| s.source == resume.row_group) {
            Some(group) => Resume {
                group,
                row: resume.row,
            },
            None => Resume {
                group: bodies.len(),
                row: 0,
            },
        }
    }

    fn build(&self, constraints: &Constraints, plan: &FragmentPlan, first: bool) -> TableFragment {
        let last = plan.resume.is_none();
        let border = self.prepared.border;
        let padding = self.prepared.padding;
        let chrome = self.prepared.chrome();
        let spacing = self.prepared.spacing.vertical;
        let table_width = self.content_width + chrome.horizontal();

        let x = constraints.x + self.margin.left;
        let margin_top = if first { self.margin.top } else { 0.0 };
        let margin_bottom = if last { self.margin.bottom } else { 0.0 };
        let wrapper_y = constraints.y + margin_top;

        let mut captions = Vec::new();
        let mut y = wrapper_y;
        if first {
            y = self.place_captions(CaptionSide::Top, x, y, table_width, &mut captions);
        }

        let table_y = y;
        let content_x = x + chrome.left;
        let content_y = table_y + chrome.top;

        let mut cursor = content_y + spacing;
        let mut row_groups = Vec::new();
        if plan.header {
            if let Some(section) = self.grid().header() {
                let rows = section.rows.clone();
                row_groups.push(self.place_group(section, rows, content_x, &mut cursor));
            }
        }
        let bodies = self.body_sections();
        for (group, rows) in &plan.slices {
            let section = bodies[*group];
            let start = section.rows.start;
            let rows = start + rows.start..start + rows.end;
            row_groups.push(self.place_group(section, rows, content_x, &mut cursor));
        }
        if plan.footer {
            if let Some(section) = self.grid().footer() {
                let rows = section.rows.clone();
                row_groups.push(self.place_group(section, rows, content_x, &mut cursor));
            }
        }

        let rows_height = if row_groups.is_empty() { 0.0 } else { cursor - content_y };
        let content_height = if first && last {
            rows_height.max(self.explicit_content_height)
        } else {
            rows_height
        };
        let table_height = content_height + chrome.vertical();

        let mut bottom = table_y + table_height;
        if last {
            bottom =
                self.place_captions(CaptionSide::Bottom, x, bottom, table_width, &mut captions);
        }

        TableFragment {
            page_index: 0,
            wrapper: BoxGeometry {
                x,
                y: wrapper_y,
                width: table_width,
                height: bottom - wrapper_y,
                padding: Edges::default(),
                border: Edges::default(),
                margin: Edges {
                    top: margin_top,
                    right: self.margin.right,
                    bottom: margin_bottom,
                    left: self.margin.left,
                },
            },
            table: BoxGeometry {
                x,
                y: table_y,
                width: table_width,
                height: table_height,
                padding,
                border,
                margin: Edges::default(),
            },
            captions,
            column_widths: self.column_widths.clone(),
            row_groups,
            continuation: plan.resume.map(|r| self.continuation(&bodies, r)),
            id: self.table.id.clone(),
        }
    }

    fn continuation(&self, bodies: &[&Section], resume: Resume) -> Continuation {
        Continuation {
            row_group: bodies.get(resume.group).map_or(0, |s| s.source),
            row: resume.row,
        }
    }

    fn place_captions(
        &self,
        side: CaptionSide,
        x: f64,
        mut y: f64,
        width: f64,
        out: &mut Vec<CaptionFragment>,
    ) -> f64 {
        for caption in self.table.captions.iter().filter(|c| c.side == side) {
            let height = caption.height.max(0.0);
            out.push(CaptionFragment {
                side,
                x,
                y,
                width,
                height,
                id: caption.id.clone(),
            });
            y += height;
        }
        y
    }

    fn place_group(
        &self,
        section: &Section,
        rows: Range<usize>,
        content_x: f64,
        cursor: &mut f64,
    ) -> RowGroupFragment {
        let spacing = self.prepared.spacing;
        let x = content_x + spacing.horizontal;
        let width = (self.content_width - 2.0 * spacing.horizontal).max(0.0);
        let top = *cursor;

        let mut placed = Vec::with_capacity(rows.len());
        for r in rows {
            let metrics = self.rows[r];
            placed.push(self.place_row(r, x, *cursor, width, content_x));
            *cursor += metrics.height + spacing.vertical;
        }
        let height = placed.last().map_or(0.0, |row: &RowFragment| row.y + row.height - top);

        RowGroupFragment {
            source: section.source,
            role: section.role,
            x,
            y: top,
            width,
            height,
            rows: placed,
            id: self.table.row_groups[section.source].id.clone(),
        }
    }

    fn place_row(&self, r: usize, x: f64, y: f64, width: f64, content_x: f64) -> RowFragment {
        let grid_row = self.grid().rows[r];
        let metrics = self.rows[r];
        let cells = self
            .grid()
            .cells_in_row(r)
            .map(|(i, placed)| self.place_cell(i, placed, y, content_x))
            .collect();

        RowFragment {
            row_group: grid_row.row_group,
            row: grid_row.row,
            grid_row: r,
            x,
            y,
            width,
            height: metrics.height,
            baseline: metrics.baseline,
            cells,
            id: self.table.row_groups[grid_row.row_group].rows[grid_row.row].id.clone(),
        }
    }

    fn place_cell(&self, i: usize, placed: &GridCell, y: f64, content_x: f64) -> CellFragment {
        let cell = &self.cells[i];
        let spacing = self.prepared.spacing.horizontal;
        let geometry = BoxGeometry {
            x: content_x + spacing + column_x_offset(placed.column, &self.column_widths, spacing),
            y,
            width: cell.width,
            height: cell.height,
            padding: cell.padding,
            border: cell.border,
            margin: Edges::default(),
        };
        let nested = cell.nested.as_ref().map(|fragment| {
            let mut fragment = fragment.clone();
            fragment.translate(geometry.content_x(), geometry.content_y() + cell.content_offset);
            Box::new(fragment)
        });

        CellFragment {
            index: placed.cell,
            grid_row: placed.grid_row,
            column: placed.column,
            rowspan: placed.rowspan,
            colspan: placed.colspan,
            geometry,
            vertical_align: cell.align,
            content_offset: cell.content_offset,
            baseline: cell.baseline,
            borders: self.prepared.collapsed.as_ref().map(|c| c.cell_sides[i]),
            nested,
            id: source_cell(self.table, placed).id.clone(),
        }
    }
}
