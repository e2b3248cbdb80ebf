//! # Table Wrapper
//!
//! The anonymous box around a table and its captions. It owns the table's
//! margins and is what the surrounding layout positions.

use crate::model::{Caption, Edges};
use crate::style::{CaptionSide, Dimension, EdgeValues};

/// Resolve margins against the containing block width. `None` is `auto`.
pub fn resolve_margins(
    margin: &EdgeValues<Dimension>,
    containing_width: f64,
) -> EdgeValues<Option<f64>> {
    margin.map(|m| m.resolve(containing_width))
}

/// Used horizontal margins for a table of border-box `width`.
///
/// Two auto margins center the table, one auto margin takes what is left,
/// and an over-constrained pair gives up `margin-right`.
pub fn horizontal_margins(
    left: Option<f64>,
    right: Option<f64>,
    width: f64,
    containing_width: f64,
) -> (f64, f64) {
    let free = containing_width - width;
    match (left, right) {
        (None, None) => {
            let half = (free / 2.0).max(0.0);
            (half, half)
        }
        (None, Some(right)) => ((free - right).max(0.0), right),
        (Some(left), None) => (left, (free - left).max(0.0)),
        (Some(left), Some(_)) if free.is_finite() => (left, (free - left).max(0.0)),
        (Some(left), Some(right)) => (left, right),
    }
}

/// Used margins of the wrapper box.
pub fn used_margins(margin: &EdgeValues<Dimension>, width: f64, containing_width: f64) -> Edges {
    let resolved = resolve_margins(margin, containing_width);
    let (left, right) = horizontal_margins(resolved.left, resolved.right, width, containing_width);
    Edges {
        top: resolved.top.unwrap_or(0.0),
        right,
        bottom: resolved.bottom.unwrap_or(0.0),
        left,
    }
}

/// Width left for the table once non-auto horizontal margins are taken out.
pub fn available_width(margin: &EdgeValues<Dimension>, containing_width: f64) -> f64 {
    let resolved = resolve_margins(margin, containing_width);
    (containing_width - resolved.left.unwrap_or(0.0) - resolved.right.unwrap_or(0.0)).max(0.0)
}

/// Total caption height above and below the table.
pub fn caption_heights(captions: &[Caption]) -> (f64, f64) {
    captions.iter().fold((0.0, 0.0), |(top, bottom), caption| {
        let h = caption.height.max(0.0);
        match caption.side {
            CaptionSide::Top => (top + h, bottom),
            CaptionSide::Bottom => (top, bottom + h),
        }
    })
}
