//! # Width Distribution
//!
//! Lower-level helpers for auto table layout: spreading extra width over a
//! set of columns. The column resolver decides *how much* to hand out; this
//! module decides *who* gets it.

/// Per-column facts that decide which columns receive extra width.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFacts<'a> {
    pub max: &'a [f64],
    pub percent: &'a [f64],
    pub constrained: &'a [bool],
    pub has_cells: &'a [bool],
}

/// Add `amount` to the listed columns in proportion to `weights`.
/// Does nothing when the weights sum to zero.
pub fn distribute_proportional(
    widths: &mut [f64],
    columns: &[usize],
    weights: &[f64],
    amount: f64,
) {
    let total: f64 = columns.iter().map(|&i| weights[i]).sum();
    if total <= 0.0 || amount <= 0.0 {
        return;
    }
    for &i in columns {
        widths[i] += amount * (weights[i] / total);
    }
}

/// Add `amount` to the listed columns in equal shares.
pub fn distribute_equally(widths: &mut [f64], columns: &[usize], amount: f64) {
    if columns.is_empty() || amount <= 0.0 {
        return;
    }
    let share = amount / columns.len() as f64;
    for &i in columns {
        widths[i] += share;
    }
}

/// Hand `excess` to `columns`, trying groups of columns in priority order.
/// The first non-empty group takes everything:
///
/// 1. unconstrained, no percentage, non-zero max-content: by max-content
/// 2. unconstrained, no percentage: equally
/// 3. constrained, no percentage, non-zero max-content: by max-content
/// 4. percentage columns: by percentage
/// 5. columns where a cell originates: equally
/// 6. any column: equally
///
/// Returns what could not be handed out (only non-zero for an empty slice).
pub fn distribute_excess(
    widths: &mut [f64],
    excess: f64,
    columns: &[usize],
    facts: &ColumnFacts<'_>,
) -> f64 {
    if excess <= 0.0 {
        return 0.0;
    }
    let pick = |f: &dyn Fn(usize) -> bool| -> Vec<usize> {
        columns.iter().copied().filter(|&i| f(i)).collect()
    };

    let group = pick(&|i| !facts.constrained[i] && facts.percent[i] == 0.0 && facts.max[i] > 0.0);
    if !group.is_empty() {
        distribute_proportional(widths, &group, facts.max, excess);
        return 0.0;
    }

    let group = pick(&|i| !facts.constrained[i] && facts.percent[i] == 0.0);
    if !group.is_empty() {
        distribute_equally(widths, &group, excess);
        return 0.0;
    }

    let group = pick(&|i| facts.constrained[i] && facts.percent[i] == 0.0 && facts.max[i] > 0.0);
    if !group.is_empty() {
        distribute_proportional(widths, &group, facts.max, excess);
        return 0.0;
    }

    let group = pick(&|i| facts.percent[i] > 0.0);
    if !group.is_empty() {
        distribute_proportional(widths, &group, facts.percent, excess);
        return 0.0;
    }

    let group = pick(&|i| facts.has_cells[i]);
    if !group.is_empty() {
        distribute_equally(widths, &group, excess);
        return 0.0;
    }

    if !columns.is_empty() {
        distribute_equally(widths, columns, excess);
        return 0.0;
    }

    excess
}
