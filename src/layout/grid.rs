//! # Table Grid
//!
//! Turns row groups, rows and cells into a row-major occupancy grid.
//!
//! - Row groups are reordered: the first header group goes first, the first
//!   footer group goes last, every other group lays out as a body in source
//!   order.
//! - Cells are placed left to right into the first stretch of free slots
//!   wide enough for their colspan, skipping slots taken by rowspans from
//!   rows above.
//! - Rowspans never leave their row group. `rowspan = 0` spans to the end
//!   of the group.
//! - When the column count is known up front (fixed layout), colspans are
//!   clamped to it and cells with no room left are dropped with a warning.

use std::ops::Range;

use crate::diagnostics::{LayoutWarning, WarningSink};
use crate::model::{RowGroupRole, Table};

/// What occupies a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    /// Index into [`Grid::cells`].
    Cell(usize),
}

/// A cell placed in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Source index of the row group.
    pub row_group: usize,
    /// Index of the row inside its group.
    pub row: usize,
    /// Index of the cell inside its row.
    pub cell: usize,
    /// Anchor row in the grid.
    pub grid_row: usize,
    /// Anchor column in the grid.
    pub column: usize,
    pub colspan: usize,
    pub rowspan: usize,
}

impl GridCell {
    /// One past the last grid row this cell occupies.
    pub fn end_row(&self) -> usize {
        self.grid_row + self.rowspan
    }

    pub fn columns(&self) -> Range<usize> {
        self.column..self.column + self.colspan
    }
}

/// A row as the grid sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow {
    pub row_group: usize,
    pub row: usize,
    /// Index into [`Grid::sections`].
    pub section: usize,
}

/// A row group after reordering, with its effective role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Source index of the row group.
    pub source: usize,
    pub role: RowGroupRole,
    /// Grid rows belonging to this group.
    pub rows: Range<usize>,
}

/// Where a grid column's constraints come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSource {
    pub group: usize,
    /// `None` when the group has no explicit columns.
    pub column: Option<usize>,
}

/// The resolved occupancy grid of a table.
#[derive(Debug, Clone)]
pub struct Grid {
    pub column_count: usize,
    pub rows: Vec<GridRow>,
    pub sections: Vec<Section>,
    pub cells: Vec<GridCell>,
    /// Column and column-group per grid column.
    pub columns: Vec<Option<ColumnSource>>,
    slots: Vec<Slot>,
}

impl Grid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn slot(&self, row: usize, column: usize) -> Slot {
        if row >= self.rows.len() || column >= self.column_count {
            return Slot::Empty;
        }
        self.slots[row * self.column_count + column]
    }

    /// Cells anchored in `row`, left to right.
    pub fn cells_in_row(&self, row: usize) -> impl Iterator<Item = (usize, &GridCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.grid_row == row)
    }

    /// The header section, if the table has one.
    pub fn header(&self) -> Option<&Section> {
        self.sections
            .first()
            .filter(|s| s.role == RowGroupRole::Header)
    }

    /// The footer section, if the table has one.
    pub fn footer(&self) -> Option<&Section> {
        self.sections
            .last()
            .filter(|s| s.role == RowGroupRole::Footer)
    }

    /// Sections that lay out as bodies, in order.
    pub fn bodies(&self) -> impl Iterator<Item = (usize, &Section)> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.role == RowGroupRole::Body)
    }
}

/// Row groups in layout order with their effective roles.
pub fn section_order(table: &Table) -> Vec<(usize, RowGroupRole)> {
    let header = table
        .row_groups
        .iter()
        .position(|g| g.role == RowGroupRole::Header);
    let footer = table
        .row_groups
        .iter()
        .position(|g| g.role == RowGroupRole::Footer);

    let mut order = Vec::with_capacity(table.row_groups.len());
    if let Some(h) = header {
        order.push((h, RowGroupRole::Header));
    }
    for i in 0..table.row_groups.len() {
        if Some(i) != header && Some(i) != footer {
            order.push((i, RowGroupRole::Body));
        }
    }
    if let Some(f) = footer {
        order.push((f, RowGroupRole::Footer));
    }
    order
}

/// Grid column count used by fixed layout: the larger of the explicit
/// column count and the colspan sum of the first row.
pub fn fixed_column_count(table: &Table) -> usize {
    let explicit: usize = table.column_groups.iter().map(|g| g.column_count()).sum();
    let first_row: usize = section_order(table)
        .first()
        .and_then(|(g, _)| table.row_groups[*g].rows.first())
        .map(|row| row.cells.iter().map(|c| c.colspan.max(1) as usize).sum())
        .unwrap_or(0);
    explicit.max(first_row)
}

/// Build the grid for a table.
///
/// `column_limit` caps the number of columns. Cells that find no free slot
/// under the cap are dropped and reported once per row.
pub fn build_grid(
    table: &Table,
    column_limit: Option<usize>,
    sink: &mut dyn WarningSink,
) -> Grid {
    let mut rows = Vec::new();
    let mut sections = Vec::new();
    let mut cells = Vec::new();
    let mut occupancy: Vec<Vec<bool>> = Vec::new();

    for (section_index, (source, role)) in section_order(table).into_iter().enumerate() {
        let group = &table.row_groups[source];
        let first = rows.len();
        let n = group.rows.len();
        occupancy.extend(std::iter::repeat_with(Vec::new).take(n));

        for (r, row) in group.rows.iter().enumerate() {
            let grid_row = first + r;
            rows.push(GridRow {
                row_group: source,
                row: r,
                section: section_index,
            });

            let mut cursor = 0;
            let mut dropped = 0;
            for (ci, cell) in row.cells.iter().enumerate() {
                let start = first_free(&occupancy[grid_row], cursor);
                if column_limit.is_some_and(|limit| start >= limit) {
                    dropped = row.cells.len() - ci;
                    break;
                }

                let remaining_rows = n - r;
                let rowspan = match cell.rowspan {
                    0 => remaining_rows,
                    span => (span as usize).min(remaining_rows),
                };
                let (column, colspan) = find_stretch(
                    &occupancy[grid_row],
                    start,
                    cell.colspan.max(1) as usize,
                    column_limit,
                );

                for occupied in &mut occupancy[grid_row..grid_row + rowspan] {
                    if occupied.len() < column + colspan {
                        occupied.resize(column + colspan, false);
                    }
                    occupied[column..column + colspan].fill(true);
                }

                cells.push(GridCell {
                    row_group: source,
                    row: r,
                    cell: ci,
                    grid_row,
                    column,
                    colspan,
                    rowspan,
                });
                cursor = column + colspan;
            }

            if dropped > 0 {
                sink.warn(LayoutWarning::ExcessCells {
                    row_group: source,
                    row: r,
                    ignored: dropped,
                });
            }
        }

        sections.push(Section {
            source,
            role,
            rows: first..rows.len(),
        });
    }

    let column_count = cells.iter().map(|c| c.column + c.colspan).max().unwrap_or(0);
    let mut slots = vec![Slot::Empty; rows.len() * column_count];
    for (index, cell) in cells.iter().enumerate() {
        for r in cell.grid_row..cell.end_row() {
            for c in cell.columns() {
                slots[r * column_count + c] = Slot::Cell(index);
            }
        }
    }

    let mut columns: Vec<Option<ColumnSource>> = column_sources(table)
        .into_iter()
        .take(column_count)
        .map(Some)
        .collect();
    columns.resize(column_count, None);

    Grid {
        column_count,
        rows,
        sections,
        cells,
        columns,
        slots,
    }
}

/// Column and group for every explicit column, spans expanded.
fn column_sources(table: &Table) -> Vec<ColumnSource> {
    let mut sources = Vec::new();
    for (g, group) in table.column_groups.iter().enumerate() {
        if group.columns.is_empty() {
            for _ in 0..group.span.max(1) {
                sources.push(ColumnSource {
                    group: g,
                    column: None,
                });
            }
        }
        for (c, column) in group.columns.iter().enumerate() {
            for _ in 0..column.span.max(1) {
                sources.push(ColumnSource {
                    group: g,
                    column: Some(c),
                });
            }
        }
    }
    sources
}

fn is_free(occupied: &[bool], column: usize) -> bool {
    !occupied.get(column).copied().unwrap_or(false)
}

fn first_free(occupied: &[bool], from: usize) -> usize {
    (from..).find(|&c| is_free(occupied, c)).unwrap_or(from)
}

/// Find where a cell of `colspan` columns goes, starting at the free slot
/// `from`. Returns the anchor column and the colspan actually used.
fn find_stretch(
    occupied: &[bool],
    from: usize,
    colspan: usize,
    limit: Option<usize>,
) -> (usize, usize) {
    let end = limit.unwrap_or(usize::MAX);
    let free_run = |start: usize, max: usize| {
        (start..end)
            .take_while(|&c| is_free(occupied, c))
            .take(max)
            .count()
    };

    // Past the occupied prefix every slot is free, so the unlimited search
    // always succeeds.
    let mut column = from;
    while column < end {
        if is_free(occupied, column) && free_run(column, colspan) == colspan {
            return (column, colspan);
        }
        if limit.is_none() && column >= occupied.len() {
            break;
        }
        column += 1;
    }
    if limit.is_none() {
        return (column, colspan);
    }

    // No full stretch under the cap: clamp the span at the first free slot.
    (from, free_run(from, colspan).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::model::{Cell, Column, ColumnGroup, Row, RowGroup};
    use crate::style::Style;

    fn row(n: usize) -> Row {
        Row::new((0..n).map(|_| Cell::empty()).collect())
    }

    fn anchors(grid: &Grid) -> Vec<(usize, usize, usize, usize)> {
        grid.cells
            .iter()
            .map(|c| (c.grid_row, c.column, c.rowspan, c.colspan))
            .collect()
    }

    #[test]
    fn test_simple_grid() {
        let table = Table::new(vec![RowGroup::body(vec![row(2), row(2)])]);
        let mut warnings: Vec<LayoutWarning> = Vec::new();
        let grid = build_grid(&table, None, &mut warnings);
        assert_eq!(grid.column_count, 2);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.slot(1, 1), Slot::Cell(3));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_rowspan_carry_skips_slot() {
        let table = Table::new(vec![RowGroup::body(vec![
            Row::new(vec![Cell::empty().with_span(1, 2), Cell::empty()]),
            Row::new(vec![Cell::empty()]),
        ])]);
        let grid = build_grid(&table, None, &mut NullSink);
        assert_eq!(anchors(&grid), vec![(0, 0, 2, 1), (0, 1, 1, 1), (1, 1, 1, 1)]);
        assert_eq!(grid.slot(1, 0), Slot::Cell(0));
    }

    #[test]
    fn test_rowspan_zero_stops_at_group_end() {
        let table = Table::new(vec![
            RowGroup::body(vec![
                Row::new(vec![Cell::empty().with_span(1, 0), Cell::empty()]),
                row(1),
                row(1),
            ]),
            RowGroup::body(vec![row(2)]),
        ]);
        let grid = build_grid(&table, None, &mut NullSink);
        assert_eq!(grid.cells[0].rowspan, 3);
        // The next group starts with a clean row.
        assert_eq!(grid.slot(3, 0), Slot::Cell(grid.cells.len() - 2));
    }

    #[test]
    fn test_rowspan_clipped_to_group() {
        let table = Table::new(vec![RowGroup::body(vec![
            Row::new(vec![Cell::empty().with_span(1, 5)]),
            row(1),
        ])]);
        let grid = build_grid(&table, None, &mut NullSink);
        assert_eq!(grid.cells[0].rowspan, 2);
        assert_eq!(grid.column_count, 2);
    }

    #[test]
    fn test_colspan_skips_to_wide_enough_stretch() {
        // Row 1 has column 1 taken by a rowspan; a colspan=2 cell cannot start
        // at column 0 and moves right.
        let table = Table::new(vec![RowGroup::body(vec![
            Row::new(vec![Cell::empty(), Cell::empty().with_span(1, 2)]),
            Row::new(vec![Cell::empty().with_span(2, 1)]),
        ])]);
        let grid = build_grid(&table, None, &mut NullSink);
        assert_eq!(grid.cells[2].column, 2);
        assert_eq!(grid.column_count, 4);
    }

    #[test]
    fn test_excess_cells_dropped_with_one_warning() {
        let table = Table::new(vec![RowGroup::body(vec![row(2), row(3)])]);
        let mut warnings: Vec<LayoutWarning> = Vec::new();
        let grid = build_grid(&table, Some(2), &mut warnings);
        assert_eq!(grid.column_count, 2);
        assert_eq!(grid.cells.len(), 4);
        assert_eq!(
            warnings,
            vec![LayoutWarning::ExcessCells {
                row_group: 0,
                row: 1,
                ignored: 1
            }]
        );
    }

    #[test]
    fn test_colspan_clamped_to_limit() {
        let table = Table::new(vec![RowGroup::body(vec![
            row(3),
            Row::new(vec![Cell::empty(), Cell::empty().with_span(12, 1)]),
        ])]);
        let mut warnings: Vec<LayoutWarning> = Vec::new();
        let grid = build_grid(&table, Some(3), &mut warnings);
        assert_eq!(grid.cells[4].colspan, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_sections_reordered() {
        let table = Table::new(vec![
            RowGroup::footer(vec![row(1)]),
            RowGroup::body(vec![row(1)]),
            RowGroup::header(vec![row(1)]),
            RowGroup::header(vec![row(1)]),
        ]);
        let order = section_order(&table);
        assert_eq!(
            order,
            vec![
                (2, RowGroupRole::Header),
                (1, RowGroupRole::Body),
                (3, RowGroupRole::Body),
                (0, RowGroupRole::Footer),
            ]
        );
        let grid = build_grid(&table, None, &mut NullSink);
        assert_eq!(grid.header().map(|s| s.source), Some(2));
        assert_eq!(grid.footer().map(|s| s.rows.clone()), Some(3..4));
        assert_eq!(grid.bodies().count(), 2);
    }

    #[test]
    fn test_fixed_column_count() {
        let table = Table::new(vec![RowGroup::body(vec![Row::new(vec![
            Cell::empty(),
            Cell::empty().with_span(2, 1),
        ])])])
        .with_columns(vec![ColumnGroup::new(
            Style::default(),
            vec![Column::new(Style::default()), Column::new(Style::default())],
        )]);
        assert_eq!(fixed_column_count(&table), 3);
    }

    #[test]
    fn test_column_sources_ignore_extra_columns() {
        let table = Table::new(vec![RowGroup::body(vec![row(1)])]).with_columns(vec![
            ColumnGroup::spanning(Style::default(), 3),
        ]);
        let grid = build_grid(&table, None, &mut NullSink);
        assert_eq!(grid.columns.len(), 1);
        assert_eq!(
            grid.columns[0],
            Some(ColumnSource {
                group: 0,
                column: None
            })
        );
    }
}
