//! # Row Heights
//!
//! Resolves row heights and the vertical position of cell content.
//!
//! Rows are finalized top to bottom and never grown afterwards. A cell
//! counts toward the height of the row where it *ends*, so a rowspan cell
//! only pushes its last row down. Baseline-aligned cells are shifted with
//! extra top padding before the row height is known; once it is, each
//! cell's leftover space becomes padding according to its alignment.
//!
//! Row positions are relative to the top of the table's content box and
//! include the vertical border-spacing above each row.

use crate::style::VerticalAlign;

/// Vertical facts about one placed cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBlock {
    pub grid_row: usize,
    pub rowspan: usize,
    /// Measured content height.
    pub content_height: f64,
    /// Declared content-box height.
    pub specified_height: Option<f64>,
    /// First-line baseline from the content top, if the content has lines.
    pub baseline: Option<f64>,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub border_top: f64,
    pub border_bottom: f64,
    pub align: VerticalAlign,
}

/// A resolved row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowMetrics {
    pub y: f64,
    pub height: f64,
    /// Baseline from the row top. The row bottom when no cell is
    /// baseline-aligned.
    pub baseline: f64,
}

/// Where a cell's content sits after alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellPlacement {
    pub padding_top: f64,
    pub padding_bottom: f64,
    /// Content-box height: the content, or the declared height if larger.
    pub height: f64,
    /// Shift of the content inside a declared height taller than it.
    pub content_offset: f64,
    /// Baseline from the cell's border-box top.
    pub baseline: f64,
}

impl CellPlacement {
    pub fn border_height(&self, cell: &CellBlock) -> f64 {
        cell.border_top + self.padding_top + self.height + self.padding_bottom + cell.border_bottom
    }
}

/// Total height of the rows, with spacing above, between and below them.
pub fn rows_extent(rows: &[RowMetrics], spacing: f64) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    spacing + rows.iter().map(|r| r.height + spacing).sum::<f64>()
}

/// Resolve every row of a table. `row_heights` holds the declared height of
/// each grid row.
pub fn resolve_rows(
    row_heights: &[Option<f64>],
    cells: &[CellBlock],
    spacing: f64,
) -> (Vec<RowMetrics>, Vec<CellPlacement>) {
    let mut placements: Vec<CellPlacement> = cells
        .iter()
        .map(|c| CellPlacement {
            padding_top: c.padding_top,
            padding_bottom: c.padding_bottom,
            height: c.content_height.max(c.specified_height.unwrap_or(0.0)).max(0.0),
            content_offset: 0.0,
            baseline: 0.0,
        })
        .collect();

    let mut rows = Vec::with_capacity(row_heights.len());
    let mut y = if row_heights.is_empty() { 0.0 } else { spacing };

    for (r, declared) in row_heights.iter().enumerate() {
        // Baseline alignment first: it changes the cells' border heights.
        let mut row_baseline: Option<f64> = None;
        for (i, cell) in cells.iter().enumerate() {
            if cell.grid_row == r && cell.align == VerticalAlign::Baseline {
                let b = cell_baseline(cell, &placements[i]);
                row_baseline = Some(row_baseline.map_or(b, |rb: f64| rb.max(b)));
            }
        }
        if let Some(rb) = row_baseline {
            for (i, cell) in cells.iter().enumerate() {
                if cell.grid_row == r && cell.align == VerticalAlign::Baseline {
                    placements[i].padding_top += rb - cell_baseline(cell, &placements[i]);
                }
            }
        }

        let ending: Vec<usize> = (0..cells.len())
            .filter(|&i| cells[i].grid_row + cells[i].rowspan.max(1) - 1 == r)
            .collect();
        let needed = ending
            .iter()
            .map(|&i| {
                // Rows before `r` are already in `rows`; the anchor row may be `r` itself.
                let start = rows.get(cells[i].grid_row).map_or(y, |m: &RowMetrics| m.y);
                start + placements[i].border_height(&cells[i]) - y
            })
            .fold(0.0_f64, f64::max);
        let height = needed.max(declared.unwrap_or(0.0)).max(0.0);

        let row_bottom = y + height;
        for &i in &ending {
            let cell = &cells[i];
            let start = rows.get(cell.grid_row).map_or(y, |m: &RowMetrics| m.y);
            let extra = (row_bottom - start - placements[i].border_height(cell)).max(0.0);
            let placement = &mut placements[i];
            match cell.align {
                VerticalAlign::Top | VerticalAlign::Baseline => placement.padding_bottom += extra,
                VerticalAlign::Middle => {
                    placement.padding_top += extra / 2.0;
                    placement.padding_bottom += extra / 2.0;
                }
                VerticalAlign::Bottom => placement.padding_top += extra,
            }

            let slack = (placement.height - cell.content_height).max(0.0);
            placement.content_offset = match cell.align {
                VerticalAlign::Middle => slack / 2.0,
                VerticalAlign::Bottom => slack,
                _ => 0.0,
            };
            placement.baseline = cell_baseline(cell, placement);
        }

        rows.push(RowMetrics {
            y,
            height,
            baseline: row_baseline.unwrap_or(height),
        });
        y = row_bottom + spacing;
    }

    (rows, placements)
}

/// Baseline from the border-box top: the first line's baseline, or the
/// bottom of the content box when there are no lines.
fn cell_baseline(cell: &CellBlock, placement: &CellPlacement) -> f64 {
    let inner = cell.baseline.unwrap_or(placement.height);
    cell.border_top + placement.padding_top + placement.content_offset + inner
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(grid_row: usize, height: f64, align: VerticalAlign) -> CellBlock {
        CellBlock {
            grid_row,
            rowspan: 1,
            content_height: height,
            specified_height: None,
            baseline: None,
            padding_top: 0.0,
            padding_bottom: 0.0,
            border_top: 0.0,
            border_bottom: 0.0,
            align,
        }
    }

    fn lines(grid_row: usize, height: f64, baseline: f64) -> CellBlock {
        CellBlock {
            baseline: Some(baseline),
            ..block(grid_row, height, VerticalAlign::Baseline)
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_row_height_is_tallest_cell() {
        let cells = vec![
            block(0, 20.0, VerticalAlign::Top),
            CellBlock {
                padding_top: 5.0,
                padding_bottom: 5.0,
                border_top: 1.0,
                border_bottom: 1.0,
                ..block(0, 30.0, VerticalAlign::Top)
            },
        ];
        let (rows, placements) = resolve_rows(&[None], &cells, 0.0);
        assert!(close(rows[0].height, 42.0));
        assert!(close(placements[0].padding_bottom, 22.0));
    }

    #[test]
    fn test_declared_row_height_is_lower_bound() {
        let cells = vec![block(0, 20.0, VerticalAlign::Bottom)];
        let (rows, placements) = resolve_rows(&[Some(50.0)], &cells, 0.0);
        assert!(close(rows[0].height, 50.0));
        assert!(close(placements[0].padding_top, 30.0));
    }

    #[test]
    fn test_middle_splits_leftover() {
        let cells = vec![
            block(0, 40.0, VerticalAlign::Top),
            block(0, 20.0, VerticalAlign::Middle),
        ];
        let (_, placements) = resolve_rows(&[None], &cells, 0.0);
        assert!(close(placements[1].padding_top, 10.0));
        assert!(close(placements[1].padding_bottom, 10.0));
    }

    #[test]
    fn test_rowspan_grows_only_last_row() {
        let cells = vec![
            CellBlock {
                rowspan: 2,
                ..block(0, 100.0, VerticalAlign::Top)
            },
            block(0, 20.0, VerticalAlign::Top),
            block(1, 20.0, VerticalAlign::Top),
        ];
        let (rows, placements) = resolve_rows(&[None, None], &cells, 10.0);
        assert!(close(rows[0].height, 20.0));
        // 100 = 20 + 10 spacing + 70
        assert!(close(rows[1].height, 70.0));
        assert!(close(rows[1].y, 40.0));
        let spanned = rows[0].height + spacing_between(1, 10.0) + rows[1].height;
        assert!(close(placements[0].border_height(&cells[0]), spanned));
    }

    fn spacing_between(gaps: usize, spacing: f64) -> f64 {
        gaps as f64 * spacing
    }

    #[test]
    fn test_rowspan_shorter_than_rows_gets_padding() {
        let cells = vec![
            CellBlock {
                rowspan: 2,
                ..block(0, 10.0, VerticalAlign::Top)
            },
            block(0, 30.0, VerticalAlign::Top),
            block(1, 30.0, VerticalAlign::Top),
        ];
        let (rows, placements) = resolve_rows(&[None, None], &cells, 0.0);
        assert!(close(rows[1].height, 30.0));
        assert!(close(placements[0].padding_bottom, 50.0));
    }

    #[test]
    fn test_baseline_adds_top_padding() {
        let cells = vec![lines(0, 60.0, 16.0), lines(0, 40.0, 36.0)];
        let (rows, placements) = resolve_rows(&[None], &cells, 0.0);
        assert!(close(placements[0].padding_top, 20.0));
        assert!(close(placements[1].padding_top, 0.0));
        assert!(close(rows[0].height, 80.0));
        assert!(close(placements[1].padding_bottom, 40.0));
        assert!(close(rows[0].baseline, 36.0));
    }

    #[test]
    fn test_baseline_without_lines_uses_content_bottom() {
        let cells = vec![
            CellBlock {
                padding_top: 15.0,
                padding_bottom: 15.0,
                ..block(0, 0.0, VerticalAlign::Baseline)
            },
            block(0, 10.0, VerticalAlign::Baseline),
        ];
        let (rows, placements) = resolve_rows(&[None], &cells, 0.0);
        assert!(close(rows[0].height, 30.0));
        assert!(close(placements[1].padding_top, 5.0));
        assert!(close(placements[1].padding_bottom, 15.0));
    }

    #[test]
    fn test_declared_cell_height_offsets_content() {
        let cells = vec![CellBlock {
            specified_height: Some(50.0),
            ..block(0, 10.0, VerticalAlign::Bottom)
        }];
        let (rows, placements) = resolve_rows(&[None], &cells, 0.0);
        assert!(close(rows[0].height, 50.0));
        assert!(close(placements[0].height, 50.0));
        assert!(close(placements[0].content_offset, 40.0));
    }

    #[test]
    fn test_empty_row_has_zero_height() {
        let cells = vec![block(0, 10.0, VerticalAlign::Top)];
        let (rows, _) = resolve_rows(&[None, None], &cells, 5.0);
        assert!(close(rows[1].height, 0.0));
        assert!(close(rows_extent(&rows, 5.0), 25.0));
    }
}
