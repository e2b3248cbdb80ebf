//! # Collapsed Borders
//!
//! In the collapsing border model every grid edge draws one border: the
//! winner among all boxes that touch the edge. Candidates are offered in
//! decreasing specificity (cells, rows, row groups, columns, column groups,
//! the table) and a candidate only replaces the current winner when it is
//! strictly stronger, so ties go to the more specific box.
//!
//! Strength is compared as: `hidden` beats everything, then the wider
//! border, then the style rank from [`BorderStyle::rank`].
//!
//! Each box then takes half of the winning width on each of its edges.

use crate::layout::grid::Grid;
use crate::model::{Edges, Table};
use crate::style::{BorderSide, BorderStyle, EdgeValues};

/// Resolved borders of a collapsed table.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedBorders {
    /// Winner on the edge above grid row `r` (`rows + 1` entries), per column.
    pub horizontal: Vec<Vec<BorderSide>>,
    /// Winner on the edge left of grid column `c` (`columns + 1` entries), per row.
    pub vertical: Vec<Vec<BorderSide>>,
    /// Half-border widths per grid cell.
    pub cells: Vec<Edges>,
    /// Widest winner along each side of each grid cell.
    pub cell_sides: Vec<EdgeValues<BorderSide>>,
    /// Half-border widths of the table box.
    pub table: Edges,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    side: BorderSide,
    /// Inside a spanning cell: no border, whatever is offered.
    locked: bool,
}

fn strength(side: &BorderSide) -> (bool, f64, u8) {
    (side.style == BorderStyle::Hidden, side.width, side.style.rank())
}

fn beats(new: &BorderSide, old: &BorderSide) -> bool {
    let (a, b) = (strength(new), strength(old));
    if a.0 != b.0 {
        return a.0;
    }
    if a.1 != b.1 {
        return a.1 > b.1;
    }
    a.2 > b.2
}

fn offer(slot: &mut Candidate, side: BorderSide) {
    if !slot.locked && beats(&side, &slot.side) {
        slot.side = side;
    }
}

/// Resolve collapsed borders for every edge of the grid.
pub fn collapse_borders(table: &Table, grid: &Grid) -> CollapsedBorders {
    let rows = grid.row_count();
    let cols = grid.column_count;
    let empty = Candidate {
        side: BorderSide::NONE,
        locked: false,
    };
    let mut horizontal = vec![vec![empty; cols]; rows + 1];
    let mut vertical = vec![vec![empty; cols + 1]; rows];

    let mut offer_box =
        |r0: usize, r1: usize, c0: usize, c1: usize, border: EdgeValues<BorderSide>| {
            for c in c0..c1 {
                offer(&mut horizontal[r0][c], border.top);
                offer(&mut horizontal[r1][c], border.bottom);
            }
            for row in vertical.iter_mut().take(r1).skip(r0) {
                offer(&mut row[c0], border.left);
                offer(&mut row[c1], border.right);
            }
        };

    // Cells
    let mut interiors = Vec::new();
    for cell in &grid.cells {
        let style = cell_style(table, cell.row_group, cell.row, cell.cell).resolve();
        offer_box(
            cell.grid_row,
            cell.end_row(),
            cell.column,
            cell.column + cell.colspan,
            style.border,
        );
        interiors.push(cell);
    }

    // Rows
    for (r, row) in grid.rows.iter().enumerate() {
        let style = table.row_groups[row.row_group].rows[row.row].style.resolve();
        offer_box(r, r + 1, 0, cols, style.border);
    }

    // Row groups
    for section in &grid.sections {
        if section.rows.is_empty() {
            continue;
        }
        let style = table.row_groups[section.source].style.resolve();
        offer_box(section.rows.start, section.rows.end, 0, cols, style.border);
    }

    // Columns, then column groups
    for (c, source) in grid.columns.iter().enumerate() {
        if let Some(column) = source.and_then(|s| s.column.map(|i| (s.group, i))) {
            let style = table.column_groups[column.0].columns[column.1].style.resolve();
            offer_box(0, rows, c, c + 1, style.border);
        }
    }
    let mut c = 0;
    while c < cols {
        let Some(source) = grid.columns[c] else {
            c += 1;
            continue;
        };
        let end = (c..cols)
            .take_while(|&i| grid.columns[i].map(|s| s.group) == Some(source.group))
            .count()
            + c;
        let style = table.column_groups[source.group].style.resolve();
        offer_box(0, rows, c, end, style.border);
        c = end;
    }

    // Table
    let table_style = table.style.resolve();
    if rows > 0 && cols > 0 {
        offer_box(0, rows, 0, cols, table_style.border);
    }

    // Inside a spanning cell there is no edge to draw.
    for cell in interiors {
        for row in horizontal.iter_mut().take(cell.end_row()).skip(cell.grid_row + 1) {
            for slot in &mut row[cell.columns()] {
                *slot = Candidate {
                    side: BorderSide::NONE,
                    locked: true,
                };
            }
        }
        for row in vertical.iter_mut().take(cell.end_row()).skip(cell.grid_row) {
            for slot in &mut row[cell.column + 1..cell.column + cell.colspan] {
                *slot = Candidate {
                    side: BorderSide::NONE,
                    locked: true,
                };
            }
        }
    }

    let horizontal: Vec<Vec<BorderSide>> = horizontal
        .into_iter()
        .map(|row| row.into_iter().map(|c| c.side).collect())
        .collect();
    let vertical: Vec<Vec<BorderSide>> = vertical
        .into_iter()
        .map(|row| row.into_iter().map(|c| c.side).collect())
        .collect();

    let widest = |sides: &mut dyn Iterator<Item = BorderSide>| {
        sides.fold(BorderSide::NONE, |best, s| if s.width > best.width { s } else { best })
    };

    let mut cells = Vec::with_capacity(grid.cells.len());
    let mut cell_sides = Vec::with_capacity(grid.cells.len());
    for cell in &grid.cells {
        let sides = EdgeValues {
            top: widest(&mut cell.columns().map(|c| horizontal[cell.grid_row][c])),
            bottom: widest(&mut cell.columns().map(|c| horizontal[cell.end_row()][c])),
            left: widest(&mut (cell.grid_row..cell.end_row()).map(|r| vertical[r][cell.column])),
            right: widest(
                &mut (cell.grid_row..cell.end_row())
                    .map(|r| vertical[r][cell.column + cell.colspan]),
            ),
        };
        cells.push(half(&sides));
        cell_sides.push(sides);
    }

    let table_edges = if rows > 0 && cols > 0 {
        half(&EdgeValues {
            top: widest(&mut horizontal[0].iter().copied()),
            bottom: widest(&mut horizontal[rows].iter().copied()),
            // Left and right come from the first row only.
            left: vertical[0][0],
            right: vertical[0][cols],
        })
    } else {
        half(&table_style.border)
    };

    CollapsedBorders {
        horizontal,
        vertical,
        cells,
        cell_sides,
        table: table_edges,
    }
}

fn half(sides: &EdgeValues<BorderSide>) -> Edges {
    Edges {
        top: sides.top.used_width() / 2.0,
        right: sides.right.used_width() / 2.0,
        bottom: sides.bottom.used_width() / 2.0,
        left: sides.left.used_width() / 2.0,
    }
}

fn cell_style(table: &Table, group: usize, row: usize, cell: usize) -> &crate::style::Style {
    &table.row_groups[group].rows[row].cells[cell].style
}
