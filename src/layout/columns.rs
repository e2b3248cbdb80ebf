//! # Column Widths
//!
//! Assigns a width to every grid column.
//!
//! Fixed layout looks at columns and the first row only. Auto layout asks
//! every cell for its min/max-content widths, folds them into per-column
//! bounds (spanning cells spread their excess over the columns they cover),
//! then picks the widths by interpolating between four guesses:
//!
//! 1. every column at its min-content width
//! 2. percentage columns at their percentage, the rest at min-content
//! 3. as 2, with length-constrained columns at max-content
//! 4. every column at max-content (percentages still honored)
//!
//! All widths here are border-box widths of cells. The table width passed
//! in and returned is the table's content width, which includes the
//! border-spacing on both sides of every column.

use crate::layout::distribute::{distribute_excess, distribute_proportional, ColumnFacts};
use crate::style::Dimension;

/// Width constraints one grid column inherits from `<col>` and `<colgroup>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub width: Dimension,
    pub group_width: Dimension,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            width: Dimension::Auto,
            group_width: Dimension::Auto,
        }
    }
}

impl ColumnSpec {
    /// The width fixed layout uses: the column's own, else its group's.
    fn declared(&self) -> Dimension {
        if self.width.is_auto() {
            self.group_width
        } else {
            self.width
        }
    }
}

/// Horizontal facts about one placed cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSpec {
    pub column: usize,
    pub colspan: usize,
    /// Anchored in the first grid row.
    pub first_row: bool,
    /// Border-box min-content width.
    pub min: f64,
    /// Border-box max-content width.
    pub max: f64,
    /// Declared content-box width.
    pub width: Dimension,
    /// Horizontal padding plus border.
    pub extra: f64,
}

/// Border-box min/max-content widths of a cell.
///
/// A declared length raises both bounds to at least that length, and makes
/// the max-content width ignore wider unwrapped content.
pub fn cell_bounds(
    content_min: f64,
    content_max: f64,
    width: Dimension,
    min_width: Dimension,
    extra: f64,
) -> (f64, f64) {
    let content_min = content_min.max(0.0);
    let (mut min, mut max) = match width {
        Dimension::Pt(w) => (content_min.max(w), content_min.max(w)),
        _ => (content_min, content_max.max(content_min)),
    };
    if let Some(floor) = min_width.points() {
        min = min.max(floor);
        max = max.max(floor);
    }
    (min + extra, max + extra)
}

/// Total border-spacing across a row of `columns` columns.
pub fn spacing_total(columns: usize, spacing: f64) -> f64 {
    if columns == 0 {
        0.0
    } else {
        spacing * (columns + 1) as f64
    }
}

/// Width of a span of columns, including the spacing between them.
pub fn span_width(start: usize, span: usize, widths: &[f64], spacing: f64) -> f64 {
    let end = (start + span).min(widths.len());
    if start >= end {
        return 0.0;
    }
    let sum: f64 = widths[start..end].iter().sum();
    sum + spacing * (end - start - 1) as f64
}

/// X offset of a column's left edge from the left edge of the first column.
pub fn column_x_offset(column: usize, widths: &[f64], spacing: f64) -> f64 {
    widths[..column.min(widths.len())]
        .iter()
        .map(|w| w + spacing)
        .sum()
}

/// Per-column bounds for auto layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnIntrinsics {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    /// Intrinsic percentage, capped so the running total never passes 100.
    pub percent: Vec<f64>,
    /// Has a length width from a column, its group, or a single-column cell.
    pub constrained: Vec<bool>,
    /// A cell originates in this column.
    pub has_cells: Vec<bool>,
}

impl ColumnIntrinsics {
    pub fn compute(columns: &[ColumnSpec], cells: &[CellSpec], spacing: f64) -> Self {
        let n = columns.len();
        let mut min = vec![0.0; n];
        let mut max = vec![0.0; n];
        let mut percent = vec![0.0_f64; n];
        let mut constrained = vec![false; n];
        let mut has_cells = vec![false; n];

        for (i, column) in columns.iter().enumerate() {
            for width in [column.group_width, column.width] {
                match width {
                    Dimension::Pt(w) => {
                        min[i] = f64::max(min[i], w);
                        max[i] = f64::max(max[i], w);
                        constrained[i] = true;
                    }
                    Dimension::Percent(p) => percent[i] = percent[i].max(p),
                    Dimension::Auto => {}
                }
            }
        }

        for cell in cells.iter().filter(|c| c.column < n) {
            has_cells[cell.column] = true;
            if cell.colspan != 1 {
                continue;
            }
            let i = cell.column;
            min[i] = f64::max(min[i], cell.min);
            max[i] = f64::max(max[i], cell.max);
            match cell.width {
                Dimension::Pt(_) => constrained[i] = true,
                Dimension::Percent(p) => percent[i] = percent[i].max(p),
                Dimension::Auto => {}
            }
        }
        for i in 0..n {
            max[i] = f64::max(max[i], min[i]);
        }

        let mut spanning: Vec<&CellSpec> = cells
            .iter()
            .filter(|c| c.colspan > 1 && c.column < n)
            .collect();
        spanning.sort_by_key(|c| c.colspan);

        for cell in &spanning {
            let Dimension::Percent(p) = cell.width else {
                continue;
            };
            let spanned: Vec<usize> = (cell.column..(cell.column + cell.colspan).min(n)).collect();
            let missing = p - spanned.iter().map(|&i| percent[i]).sum::<f64>();
            let open: Vec<usize> = spanned.iter().copied().filter(|&i| percent[i] == 0.0).collect();
            if missing <= 0.0 || open.is_empty() {
                continue;
            }
            if open.iter().any(|&i| max[i] > 0.0) {
                distribute_proportional(&mut percent, &open, &max, missing);
            } else {
                let ones = vec![1.0; n];
                distribute_proportional(&mut percent, &open, &ones, missing);
            }
        }

        let mut total = 0.0;
        for p in percent.iter_mut() {
            *p = p.min(100.0 - total).max(0.0);
            total += *p;
        }

        for cell in &spanning {
            let spanned: Vec<usize> = (cell.column..(cell.column + cell.colspan).min(n)).collect();
            let inner_spacing = spacing * (spanned.len().saturating_sub(1)) as f64;

            let max_snapshot = max.clone();
            let facts = ColumnFacts {
                max: &max_snapshot,
                percent: &percent,
                constrained: &constrained,
                has_cells: &has_cells,
            };
            let excess = cell.min - inner_spacing - spanned.iter().map(|&i| min[i]).sum::<f64>();
            distribute_excess(&mut min, excess, &spanned, &facts);
            let excess = cell.max - inner_spacing - spanned.iter().map(|&i| max[i]).sum::<f64>();
            distribute_excess(&mut max, excess, &spanned, &facts);

            for &i in &spanned {
                max[i] = f64::max(max[i], min[i]);
            }
        }

        Self {
            min,
            max,
            percent,
            constrained,
            has_cells,
        }
    }

    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    pub fn facts(&self) -> ColumnFacts<'_> {
        ColumnFacts {
            max: &self.max,
            percent: &self.percent,
            constrained: &self.constrained,
            has_cells: &self.has_cells,
        }
    }

    /// Table min-content width (content box).
    pub fn table_min(&self, spacing: f64) -> f64 {
        self.min.iter().sum::<f64>() + spacing_total(self.len(), spacing)
    }

    /// Table max-content width (content box). Percentage columns can push
    /// this past the plain sum: a 50% column with 100pt of content needs a
    /// 200pt table. Infinite when percentages leave no room for the rest.
    pub fn table_max(&self, spacing: f64) -> f64 {
        let sum: f64 = self.max.iter().sum();
        let percent_total: f64 = self.percent.iter().sum();

        let mut widest = sum;
        if percent_total > 0.0 {
            let rest: f64 = self
                .max
                .iter()
                .zip(&self.percent)
                .filter(|(_, p)| **p == 0.0)
                .map(|(m, _)| *m)
                .sum();
            let large = if percent_total >= 100.0 {
                if rest > 0.0 {
                    f64::INFINITY
                } else {
                    0.0
                }
            } else {
                rest / ((100.0 - percent_total) / 100.0)
            };
            let small = self
                .max
                .iter()
                .zip(&self.percent)
                .filter(|(_, p)| **p > 0.0)
                .map(|(m, p)| m / (p / 100.0))
                .fold(0.0, f64::max);
            widest = widest.max(large).max(small);
        }
        widest + spacing_total(self.len(), spacing)
    }
}

/// Content width of an auto-layout table.
///
/// An auto width fits the available space between min- and max-content.
/// `min_width`/`max_width` then clamp, and the table never drops below its
/// min-content width.
pub fn used_table_width(
    min_content: f64,
    max_content: f64,
    specified: Option<f64>,
    available: f64,
    min_width: Option<f64>,
    max_width: Option<f64>,
) -> f64 {
    let mut width = match specified {
        Some(w) => w,
        None => available.min(max_content).max(min_content),
    };
    if let Some(cap) = max_width {
        width = width.min(cap);
    }
    if let Some(floor) = min_width {
        width = width.max(floor);
    }
    width.max(min_content).max(0.0)
}

/// Auto layout: column widths for a table of content width `table_width`.
pub fn auto_layout(intrinsics: &ColumnIntrinsics, spacing: f64, table_width: f64) -> Vec<f64> {
    let n = intrinsics.len();
    if n == 0 {
        return vec![];
    }
    let assignable = (table_width - spacing_total(n, spacing)).max(0.0);

    let min = &intrinsics.min;
    let max = &intrinsics.max;
    let pct = &intrinsics.percent;

    let min_guess = min.clone();
    let percentage_guess: Vec<f64> = (0..n)
        .map(|i| {
            if pct[i] > 0.0 {
                min[i].max(pct[i] / 100.0 * assignable)
            } else {
                min[i]
            }
        })
        .collect();
    let specified_guess: Vec<f64> = (0..n)
        .map(|i| {
            if pct[i] > 0.0 {
                percentage_guess[i]
            } else if intrinsics.constrained[i] {
                max[i]
            } else {
                min[i]
            }
        })
        .collect();
    let max_guess: Vec<f64> = (0..n)
        .map(|i| if pct[i] > 0.0 { percentage_guess[i] } else { max[i] })
        .collect();

    let guesses = [min_guess, percentage_guess, specified_guess, max_guess];
    let sums: Vec<f64> = guesses.iter().map(|g| g.iter().sum()).collect();

    if assignable <= sums[0] {
        return guesses[0].clone();
    }

    if assignable <= sums[3] {
        let lower = (0..4).rev().find(|&g| sums[g] <= assignable).unwrap_or(0);
        let upper = (0..4).find(|&g| sums[g] >= assignable).unwrap_or(3);
        if sums[upper] <= sums[lower] {
            return guesses[lower].clone();
        }
        let ratio = (assignable - sums[lower]) / (sums[upper] - sums[lower]);
        return (0..n)
            .map(|i| guesses[lower][i] + (guesses[upper][i] - guesses[lower][i]) * ratio)
            .collect();
    }

    let mut widths = guesses[3].clone();
    let all: Vec<usize> = (0..n).collect();
    distribute_excess(&mut widths, assignable - sums[3], &all, &intrinsics.facts());
    widths
}

/// Result of fixed layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWidths {
    pub widths: Vec<f64>,
    /// Table content width, grown when the columns need more room.
    pub table_width: f64,
}

/// Fixed layout: widths from columns, then from first-row cells; columns
/// still unknown share what is left. Leftover space goes to every column
/// equally; a shortfall grows the table.
pub fn fixed_layout(
    columns: &[ColumnSpec],
    cells: &[CellSpec],
    spacing: f64,
    table_width: f64,
) -> FixedWidths {
    let n = columns.len();
    let mut widths: Vec<Option<f64>> = columns
        .iter()
        .map(|c| c.declared().resolve(table_width).map(|w| w.max(0.0)))
        .collect();

    for cell in cells.iter().filter(|c| c.first_row && c.column < n) {
        let Some(content) = cell.width.resolve(table_width) else {
            continue;
        };
        let spanned = cell.column..(cell.column + cell.colspan).min(n);
        let mut remaining = content + cell.extra - spacing * (spanned.len() - 1) as f64;
        let mut unknown = Vec::new();
        for i in spanned {
            match widths[i] {
                Some(w) => remaining -= w,
                None => unknown.push(i),
            }
        }
        if !unknown.is_empty() {
            let share = remaining.max(0.0) / unknown.len() as f64;
            for i in unknown {
                widths[i] = Some(share);
            }
        }
    }

    let all_spacing = spacing_total(n, spacing);
    let unknown = widths.iter().filter(|w| w.is_none()).count();
    if unknown > 0 {
        let known: f64 = widths.iter().flatten().sum();
        let share = (table_width - known - all_spacing).max(0.0) / unknown as f64;
        for w in widths.iter_mut().filter(|w| w.is_none()) {
            *w = Some(share);
        }
    }

    let mut widths: Vec<f64> = widths.into_iter().map(|w| w.unwrap_or(0.0)).collect();
    let mut table_width = table_width;
    let extra = table_width - widths.iter().sum::<f64>() - all_spacing;
    if extra <= 0.0 {
        table_width -= extra;
    } else if n > 0 {
        let share = extra / n as f64;
        for w in widths.iter_mut() {
            *w += share;
        }
    }

    FixedWidths {
        widths,
        table_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_widths(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.001, "{:?} vs {:?}", actual, expected);
        }
    }

    fn cell(column: usize, colspan: usize, min: f64, max: f64, width: Dimension) -> CellSpec {
        let (min, max) = cell_bounds(min, max, width, Dimension::Auto, 0.0);
        CellSpec {
            column,
            colspan,
            first_row: true,
            min,
            max,
            width,
            extra: 0.0,
        }
    }

    fn later(mut spec: CellSpec) -> CellSpec {
        spec.first_row = false;
        spec
    }

    fn col(width: Dimension) -> ColumnSpec {
        ColumnSpec {
            width,
            group_width: Dimension::Auto,
        }
    }

    fn group(width: Dimension) -> ColumnSpec {
        ColumnSpec {
            width: Dimension::Auto,
            group_width: width,
        }
    }

    // ─── Helpers ────────────────────────────────────────────────

    #[test]
    fn test_span_width() {
        let widths = vec![100.0, 200.0, 150.0];
        assert!((span_width(0, 1, &widths, 10.0) - 100.0).abs() < 0.001);
        assert!((span_width(0, 2, &widths, 10.0) - 310.0).abs() < 0.001);
        assert!((span_width(0, 3, &widths, 10.0) - 470.0).abs() < 0.001);
    }

    #[test]
    fn test_column_x_offset() {
        let widths = vec![100.0, 200.0, 150.0];
        assert!((column_x_offset(0, &widths, 10.0) - 0.0).abs() < 0.001);
        assert!((column_x_offset(1, &widths, 10.0) - 110.0).abs() < 0.001);
        assert!((column_x_offset(2, &widths, 10.0) - 320.0).abs() < 0.001);
    }

    #[test]
    fn test_cell_bounds_with_width() {
        assert_eq!(cell_bounds(4.0, 4.0, Dimension::Pt(20.0), Dimension::Auto, 2.0), (22.0, 22.0));
        assert_eq!(
            cell_bounds(30.0, 90.0, Dimension::Pt(20.0), Dimension::Auto, 0.0),
            (30.0, 30.0)
        );
        assert_eq!(cell_bounds(4.0, 36.0, Dimension::Auto, Dimension::Auto, 6.0), (10.0, 42.0));
    }

    // ─── Fixed layout ───────────────────────────────────────────

    #[test]
    fn test_fixed_extra_space_shared_by_all_columns() {
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Pt(20.0)),
            cell(1, 1, 0.0, 0.0, Dimension::Pt(40.0)),
        ];
        let result = fixed_layout(&[ColumnSpec::default(); 2], &cells, 10.0, 200.0);
        assert_widths(&result.widths, &[75.0, 95.0]);
        assert!((result.table_width - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_fixed_ignores_later_rows() {
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Pt(40.0)),
            cell(1, 1, 0.0, 0.0, Dimension::Auto),
            later(cell(0, 1, 0.0, 0.0, Dimension::Pt(50.0))),
            later(cell(1, 1, 0.0, 0.0, Dimension::Pt(30.0))),
        ];
        let result = fixed_layout(&[ColumnSpec::default(); 2], &cells, 10.0, 110.0);
        assert_widths(&result.widths, &[40.0, 40.0]);
        assert!((result.table_width - 110.0).abs() < 0.001);
    }

    #[test]
    fn test_fixed_column_width_wins_over_cells() {
        let columns = vec![col(Dimension::Auto), col(Dimension::Pt(20.0))];
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Auto),
            cell(1, 1, 0.0, 0.0, Dimension::Pt(70.0)),
        ];
        let result = fixed_layout(&columns, &cells, 0.0, 100.0);
        assert_widths(&result.widths, &[80.0, 20.0]);
    }

    #[test]
    fn test_fixed_overflow_grows_table() {
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Percent(50.0)),
            cell(1, 1, 0.0, 0.0, Dimension::Percent(60.0)),
            cell(2, 1, 0.0, 0.0, Dimension::Auto),
        ];
        let result = fixed_layout(&[ColumnSpec::default(); 3], &cells, 100.0, 1000.0);
        assert_widths(&result.widths, &[500.0, 600.0, 0.0]);
        assert!((result.table_width - 1500.0).abs() < 0.001);
    }

    #[test]
    fn test_fixed_spanning_cell_splits_unknown_columns() {
        let columns = vec![col(Dimension::Pt(10.0)), col(Dimension::Auto), col(Dimension::Auto)];
        let cells = vec![cell(0, 3, 0.0, 0.0, Dimension::Pt(110.0))];
        let result = fixed_layout(&columns, &cells, 10.0, 130.0);
        // 110 - 2 × 10 spacing - 10 known = 80 for two columns.
        assert_widths(&result.widths, &[10.0, 40.0, 40.0]);
        assert!((result.table_width - 130.0).abs() < 0.001);
    }

    // ─── Auto layout ────────────────────────────────────────────

    fn auto(
        columns: &[ColumnSpec],
        cells: &[CellSpec],
        spacing: f64,
        available: f64,
        specified: Option<f64>,
    ) -> (Vec<f64>, f64) {
        let intrinsics = ColumnIntrinsics::compute(columns, cells, spacing);
        let width = used_table_width(
            intrinsics.table_min(spacing),
            intrinsics.table_max(spacing),
            specified,
            available,
            None,
            None,
        );
        (auto_layout(&intrinsics, spacing, width), width)
    }

    #[test]
    fn test_auto_percent_columns() {
        let columns = vec![col(Dimension::Percent(70.0)), col(Dimension::Percent(30.0))];
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Auto),
            cell(1, 1, 0.0, 0.0, Dimension::Auto),
        ];
        let (widths, _) = auto(&columns, &cells, 0.0, 1000.0, Some(200.0));
        assert_widths(&widths, &[140.0, 60.0]);
    }

    #[test]
    fn test_auto_two_twenty_percent_columns_fill_row() {
        let columns = vec![group(Dimension::Percent(20.0)), group(Dimension::Percent(20.0))];
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Auto),
            cell(1, 1, 0.0, 0.0, Dimension::Auto),
        ];
        let (widths, _) = auto(&columns, &cells, 0.0, 1000.0, Some(200.0));
        assert_widths(&widths, &[100.0, 100.0]);
    }

    #[test]
    fn test_auto_excess_to_unconstrained_content() {
        let cells = vec![
            cell(0, 1, 4.0, 4.0, Dimension::Pt(20.0)),
            cell(1, 1, 40.0, 40.0, Dimension::Auto),
        ];
        let (widths, _) = auto(&[ColumnSpec::default(); 2], &cells, 10.0, 1000.0, Some(120.0));
        assert_widths(&widths, &[20.0, 70.0]);
    }

    #[test]
    fn test_auto_interpolates_between_guesses() {
        let columns = vec![col(Dimension::Auto), col(Dimension::Pt(6.0))];
        let cells = vec![
            cell(0, 1, 4.0, 8.0, Dimension::Auto),
            cell(1, 1, 0.0, 0.0, Dimension::Pt(8.0)),
        ];
        let (widths, width) = auto(&columns, &cells, 0.0, 1000.0, Some(14.0));
        assert_widths(&widths, &[6.0, 8.0]);
        assert!((width - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_auto_table_grows_to_min_content() {
        let cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Pt(60.0)),
            cell(1, 1, 0.0, 0.0, Dimension::Auto),
            later(cell(0, 1, 0.0, 0.0, Dimension::Pt(50.0))),
            later(cell(1, 1, 0.0, 0.0, Dimension::Pt(30.0))),
        ];
        let (widths, width) = auto(&[ColumnSpec::default(); 2], &cells, 10.0, 1000.0, Some(110.0));
        assert_widths(&widths, &[60.0, 30.0]);
        assert!((width - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_auto_shrinks_to_available() {
        let cells = vec![
            cell(0, 1, 4.0, 4.0, Dimension::Auto),
            cell(1, 1, 4.0, 36.0, Dimension::Auto),
            later(cell(0, 1, 0.0, 0.0, Dimension::Auto)),
        ];
        let (widths, width) = auto(&[ColumnSpec::default(); 2], &cells, 1.0, 21.0, None);
        assert!((width - 21.0).abs() < 0.001);
        assert_widths(&widths, &[4.0, 14.0]);
    }

    #[test]
    fn test_auto_colspan_distribution() {
        // Row 1: 10pt cell, empty colspan=3.
        // Row 2: 22pt colspan=2, 8pt, 8pt.
        // Row 3: empty, empty, empty colspan=2.
        let mut cells = vec![
            cell(0, 1, 0.0, 0.0, Dimension::Pt(10.0)),
            cell(1, 3, 0.0, 0.0, Dimension::Auto),
        ];
        cells.extend([
            later(cell(0, 2, 0.0, 0.0, Dimension::Pt(22.0))),
            later(cell(2, 1, 0.0, 0.0, Dimension::Pt(8.0))),
            later(cell(3, 1, 0.0, 0.0, Dimension::Pt(8.0))),
            later(cell(0, 1, 0.0, 0.0, Dimension::Auto)),
            later(cell(1, 1, 0.0, 0.0, Dimension::Auto)),
            later(cell(2, 2, 0.0, 0.0, Dimension::Auto)),
        ]);
        let (widths, width) = auto(&[ColumnSpec::default(); 4], &cells, 0.0, 1000.0, None);
        assert_widths(&widths, &[10.0, 12.0, 8.0, 8.0]);
        assert!((width - 38.0).abs() < 0.001);

        let spaced = cells_with_spacing();
        let (widths, width) = auto(&[ColumnSpec::default(); 4], &spaced, 10.0, 1000.0, None);
        assert_widths(&widths, &[10.0, 12.0, 8.0, 8.0]);
        assert!((width - 88.0).abs() < 0.001);
    }

    fn cells_with_spacing() -> Vec<CellSpec> {
        vec![
            cell(0, 1, 0.0, 0.0, Dimension::Pt(10.0)),
            cell(1, 3, 0.0, 0.0, Dimension::Auto),
            later(cell(0, 2, 0.0, 0.0, Dimension::Pt(32.0))),
            later(cell(2, 1, 0.0, 0.0, Dimension::Pt(8.0))),
            later(cell(3, 1, 0.0, 0.0, Dimension::Pt(8.0))),
            later(cell(0, 1, 0.0, 0.0, Dimension::Auto)),
            later(cell(1, 1, 0.0, 0.0, Dimension::Auto)),
            later(cell(2, 2, 0.0, 0.0, Dimension::Auto)),
        ]
    }

    #[test]
    fn test_auto_empty_spanning_columns_share() {
        let cells = vec![
            cell(0, 2, 0.0, 0.0, Dimension::Auto),
            cell(2, 1, 0.0, 0.0, Dimension::Auto),
        ];
        let (widths, _) = auto(&[ColumnSpec::default(); 3], &cells, 0.0, 1000.0, Some(30.0));
        assert!((span_width(0, 2, &widths, 0.0) - 20.0).abs() < 0.001);
        assert!((widths[2] - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_auto_mixed_group_percent_and_length() {
        let columns = vec![
            group(Dimension::Percent(10.0)),
            group(Dimension::Percent(10.0)),
            group(Dimension::Pt(200.0)),
            group(Dimension::Pt(200.0)),
        ];
        let cells: Vec<CellSpec> = (0..4).map(|i| cell(i, 1, 0.0, 0.0, Dimension::Auto)).collect();
        let (widths, width) = auto(&columns, &cells, 0.0, 1000.0, None);
        assert_widths(&widths, &[50.0, 50.0, 200.0, 200.0]);
        assert!((width - 500.0).abs() < 0.001);
    }

    #[test]
    fn test_auto_percent_cap_at_hundred() {
        let columns = vec![col(Dimension::Percent(80.0)), col(Dimension::Percent(80.0))];
        let intrinsics = ColumnIntrinsics::compute(&columns, &[], 0.0);
        assert_widths(&intrinsics.percent, &[80.0, 20.0]);
    }

    #[test]
    fn test_auto_widths_never_below_min() {
        let cells = vec![
            cell(0, 1, 50.0, 80.0, Dimension::Auto),
            cell(1, 1, 30.0, 200.0, Dimension::Auto),
        ];
        let (widths, _) = auto(&[ColumnSpec::default(); 2], &cells, 0.0, 60.0, None);
        assert!(widths[0] >= 50.0 - 0.001);
        assert!(widths[1] >= 30.0 - 0.001);
    }
}
