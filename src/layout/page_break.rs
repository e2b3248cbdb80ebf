//! # Page Break Decisions
//!
//! Decides which rows of a table go into the next fragment. Works purely on
//! row heights: widths and heights are resolved before pagination starts,
//! so a fragment is just a contiguous run of body rows plus the repeated
//! header and footer.
//!
//! Rules:
//! - A break may fall between any two rows. Rows are never split.
//! - The first row on an empty page is always placed, even when it is
//!   taller than the page. Nothing else is allowed to overflow.
//! - A row group (or the whole table) that avoids breaks inside moves to
//!   the next page as a unit, unless no body row precedes it on an empty
//!   page.
//! - Header and footer repeat in every fragment. When they leave no room
//!   for a single body row on an empty page, the footer is dropped, then
//!   the header, then both. A table without body rows keeps them even when
//!   they overflow an empty page.
//! - The last fragment also has to hold what follows the table rows, such
//!   as bottom captions. Rows that would push it off the page move on.

use std::ops::Range;

/// Slack for floating-point noise when comparing heights.
const EPSILON: f64 = 1e-6;

/// A body row group as the fragmenter sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyGroup {
    pub avoid_break: bool,
    /// Block space each row consumes: its height plus the spacing below it.
    pub rows: Vec<f64>,
}

/// Where the next fragment starts: a body group and a row inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resume {
    pub group: usize,
    pub row: usize,
}

/// Block space available to the rows of one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSpace {
    /// `None` when the fragment is unbounded (no pagination).
    pub available: Option<f64>,
    /// Nothing has been placed on this page yet.
    pub page_is_empty: bool,
    /// Block space only the last fragment needs below its rows.
    pub trailing: f64,
}

/// The rows that make up one fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentPlan {
    pub header: bool,
    pub footer: bool,
    /// Body group index and the rows taken from it, in order. Never empty.
    pub slices: Vec<(usize, Range<usize>)>,
    /// Where the next fragment continues, if anything is left.
    pub resume: Option<Resume>,
}

impl FragmentPlan {
    pub fn body_row_count(&self) -> usize {
        self.slices.iter().map(|(_, rows)| rows.len()).sum()
    }
}

/// What to do with the next fragment of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place these rows on the current page.
    Place(FragmentPlan),
    /// Nothing can go on this page; start the table on the next one.
    MoveToNextPage,
}

type Placement = (Vec<(usize, Range<usize>)>, Option<Resume>);

/// Plan the fragment that starts at `start`.
///
/// `header` and `footer` are the block space the repeated groups consume.
/// `avoid_table_break` only applies to the first fragment of a table.
pub fn decide_break(
    header: Option<f64>,
    footer: Option<f64>,
    bodies: &[BodyGroup],
    start: Resume,
    space: FragmentSpace,
    avoid_table_break: bool,
) -> BreakDecision {
    let Some(available) = space.available else {
        let (slices, resume) = place_bodies(bodies, start, f64::INFINITY, true, true);
        return BreakDecision::Place(FragmentPlan {
            header: header.is_some(),
            footer: footer.is_some(),
            slices,
            resume,
        });
    };

    let table_has_body_rows = bodies.iter().any(|g| !g.rows.is_empty());
    let keep_overflowing = !table_has_body_rows && space.page_is_empty;
    let mut attempts: Vec<(bool, bool)> = Vec::with_capacity(4);
    for (use_header, use_footer) in [(true, true), (true, false), (false, true), (false, false)] {
        if (use_header && header.is_none()) || (use_footer && footer.is_none()) {
            continue;
        }
        // Without body rows there is nothing to make room for.
        let full = (header.is_some(), footer.is_some());
        if !table_has_body_rows && (use_header, use_footer) != full {
            continue;
        }
        let repeated = chrome(header, use_header) + chrome(footer, use_footer);
        if repeated > available + EPSILON && !keep_overflowing {
            continue;
        }
        attempts.push((use_header, use_footer));
    }

    let last = attempts.len().saturating_sub(1);
    for (i, &(use_header, use_footer)) in attempts.iter().enumerate() {
        let room = available - chrome(header, use_header) - chrome(footer, use_footer);
        let forced = space.page_is_empty && i == last;
        let (slices, resume) = fill(bodies, start, room, space, forced);

        if slices.is_empty() && table_has_body_rows && space.page_is_empty && i != last {
            continue;
        }
        if slices.is_empty() && table_has_body_rows && resume.is_some() {
            return BreakDecision::MoveToNextPage;
        }
        if avoid_table_break && resume.is_some() && !space.page_is_empty {
            return BreakDecision::MoveToNextPage;
        }
        return BreakDecision::Place(FragmentPlan {
            header: use_header,
            footer: use_footer,
            slices,
            resume,
        });
    }

    // No attempt fits at all: the table's own chrome is taller than the space.
    if !space.page_is_empty {
        return BreakDecision::MoveToNextPage;
    }
    let (slices, resume) = fill(bodies, start, available, space, true);
    BreakDecision::Place(FragmentPlan {
        header: false,
        footer: false,
        slices,
        resume,
    })
}

fn chrome(height: Option<f64>, used: bool) -> f64 {
    if used {
        height.unwrap_or(0.0)
    } else {
        0.0
    }
}

/// Place rows into `room`. When that finishes the table, the trailing space
/// has to fit too; otherwise rows are taken again from a smaller room.
fn fill(
    bodies: &[BodyGroup],
    start: Resume,
    room: f64,
    space: FragmentSpace,
    forced: bool,
) -> Placement {
    let (slices, resume) = place_bodies(bodies, start, room, space.page_is_empty, forced);
    if resume.is_some() || space.trailing <= 0.0 {
        return (slices, resume);
    }
    let used: f64 = slices
        .iter()
        .flat_map(|(g, rows)| bodies[*g].rows[rows.clone()].iter())
        .sum();
    if used + space.trailing <= room + EPSILON {
        return (slices, resume);
    }
    place_bodies(bodies, start, room - space.trailing, space.page_is_empty, forced)
}

/// Fill `room` with body rows from `start`. With `forced`, the first row
/// goes in whatever its height. `page_is_empty` says no body row precedes
/// `start` on this page, which lets a break-avoiding group split there.
fn place_bodies(
    bodies: &[BodyGroup],
    start: Resume,
    room: f64,
    page_is_empty: bool,
    forced: bool,
) -> Placement {
    let mut slices = Vec::new();
    let mut used = 0.0;
    let mut at_page_start = page_is_empty;
    let mut may_overflow = forced;

    for (g, group) in bodies.iter().enumerate().skip(start.group) {
        let first = if g == start.group { start.row } else { 0 };
        if first >= group.rows.len() {
            continue;
        }

        let empty_at_group_start = at_page_start;
        let mut end = first;
        for &height in &group.rows[first..] {
            if used + height > room + EPSILON && !may_overflow {
                break;
            }
            used += height;
            end += 1;
            at_page_start = false;
            may_overflow = false;
        }

        if end < group.rows.len() {
            if group.avoid_break && !empty_at_group_start {
                return (slices, Some(Resume { group: g, row: first }));
            }
            if end > first {
                slices.push((g, first..end));
            }
            return (slices, Some(Resume { group: g, row: end }));
        }
        slices.push((g, first..end));
    }

    (slices, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(rows: &[f64]) -> BodyGroup {
        BodyGroup {
            avoid_break: false,
            rows: rows.to_vec(),
        }
    }

    fn avoid(rows: &[f64]) -> BodyGroup {
        BodyGroup {
            avoid_break: true,
            rows: rows.to_vec(),
        }
    }

    fn space(available: f64, page_is_empty: bool) -> FragmentSpace {
        FragmentSpace {
            available: Some(available),
            page_is_empty,
            trailing: 0.0,
        }
    }

    /// Decide the first fragment of a table that does not avoid breaks.
    fn decide(
        header: Option<f64>,
        footer: Option<f64>,
        bodies: &[BodyGroup],
        space: FragmentSpace,
    ) -> BreakDecision {
        decide_break(header, footer, bodies, Resume::default(), space, false)
    }

    fn place(decision: BreakDecision) -> FragmentPlan {
        match decision {
            BreakDecision::Place(plan) => plan,
            BreakDecision::MoveToNextPage => panic!("expected a fragment"),
        }
    }

    /// Run the fragmenter page by page, one plan per page.
    fn paginate_with(
        header: Option<f64>,
        footer: Option<f64>,
        bodies: &[BodyGroup],
        first_page: f64,
        page: f64,
        avoid_table: bool,
        trailing: f64,
    ) -> Vec<FragmentPlan> {
        let mut plans = Vec::new();
        let mut start = Resume::default();
        let mut current = FragmentSpace {
            trailing,
            ..space(first_page, first_page >= page)
        };
        let mut first = true;
        loop {
            match decide_break(header, footer, bodies, start, current, avoid_table && first) {
                BreakDecision::MoveToNextPage => plans.push(FragmentPlan::default()),
                BreakDecision::Place(plan) => {
                    first = false;
                    let resume = plan.resume;
                    plans.push(plan);
                    match resume {
                        Some(r) => start = r,
                        None => break,
                    }
                }
            }
            current = FragmentSpace {
                trailing,
                ..space(page, true)
            };
            assert!(plans.len() < 50, "pagination did not terminate");
        }
        plans
    }

    fn paginate(
        header: Option<f64>,
        footer: Option<f64>,
        bodies: &[BodyGroup],
        first_page: f64,
        page: f64,
        avoid_table: bool,
    ) -> Vec<FragmentPlan> {
        paginate_with(header, footer, bodies, first_page, page, avoid_table, 0.0)
    }

    fn counts(plans: &[FragmentPlan]) -> Vec<usize> {
        plans.iter().map(|p| p.body_row_count()).collect()
    }

    #[test]
    fn everything_fits() {
        let bodies = [body(&[20.0, 30.0, 40.0])];
        let decision = decide(None, None, &bodies, space(100.0, false));
        assert_eq!(
            decision,
            BreakDecision::Place(FragmentPlan {
                header: false,
                footer: false,
                slices: vec![(0, 0..3)],
                resume: None,
            })
        );
    }

    #[test]
    fn unbounded_takes_everything() {
        let bodies = [body(&[500.0]), body(&[]), body(&[500.0, 500.0])];
        let unbounded = FragmentSpace {
            available: None,
            page_is_empty: false,
            trailing: 0.0,
        };
        let start = Resume::default();
        let plan = place(decide_break(Some(10.0), None, &bodies, start, unbounded, true));
        assert!(plan.header);
        assert_eq!(plan.slices, vec![(0, 0..1), (2, 0..2)]);
        assert_eq!(plan.resume, None);
    }

    #[test]
    fn split_at_right_point() {
        let bodies = [body(&[20.0, 30.0, 40.0])];
        let plan = place(decide(None, None, &bodies, space(55.0, false)));
        assert_eq!(plan.slices, vec![(0, 0..2)]);
        assert_eq!(plan.resume, Some(Resume { group: 0, row: 2 }));
    }

    #[test]
    fn tall_row_forced_alone() {
        let rows = [40.0, 40.0, 40.0, 40.0, 40.0, 300.0, 40.0, 40.0];
        let plans = paginate(None, None, &[body(&rows)], 90.0, 120.0, false);
        assert_eq!(counts(&plans), vec![2, 3, 1, 2]);
    }

    #[test]
    fn tall_row_on_non_empty_page_moves() {
        let bodies = [body(&[300.0])];
        let decision = decide(None, None, &bodies, space(90.0, false));
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn avoiding_table_moves_as_a_whole() {
        let plans = paginate(None, None, &[body(&[40.0; 4])], 90.0, 120.0, true);
        assert_eq!(counts(&plans), vec![0, 3, 1]);
    }

    #[test]
    fn avoiding_group_moves_as_a_whole() {
        let bodies = [body(&[40.0]), avoid(&[40.0, 40.0])];
        let plans = paginate(None, None, &bodies, 90.0, 120.0, false);
        assert_eq!(counts(&plans), vec![1, 2]);
    }

    #[test]
    fn avoiding_group_taller_than_page_splits() {
        let plans = paginate(None, None, &[avoid(&[60.0, 60.0, 60.0])], 100.0, 100.0, false);
        assert_eq!(counts(&plans), vec![1, 1, 1]);
    }

    #[test]
    fn avoiding_group_keeps_header() {
        let plans = paginate(Some(20.0), None, &[avoid(&[60.0, 60.0, 60.0])], 100.0, 100.0, false);
        assert_eq!(counts(&plans), vec![1, 1, 1]);
        assert!(plans.iter().all(|p| p.header));
    }

    #[test]
    fn header_and_footer_dropped_when_in_the_way() {
        let rows = [60.0, 10.0, 50.0, 61.0, 90.0];
        let plans = paginate(Some(20.0), Some(20.0), &[body(&rows)], 70.0, 100.0, false);
        assert_eq!(counts(&plans), vec![0, 1, 2, 1, 1]);
        let repeated: Vec<(bool, bool)> = plans
            .iter()
            .skip(1)
            .map(|p| (p.header, p.footer))
            .collect();
        assert_eq!(
            repeated,
            vec![(true, true), (true, true), (true, false), (false, false)]
        );
    }

    #[test]
    fn negative_space_defers_then_forces() {
        let bodies = [body(&[10.0])];
        assert_eq!(
            decide(None, None, &bodies, space(-5.0, false)),
            BreakDecision::MoveToNextPage
        );
        let plan = place(decide(None, None, &bodies, space(-5.0, true)));
        assert_eq!(plan.slices, vec![(0, 0..1)]);
    }

    #[test]
    fn table_without_body_rows_keeps_header() {
        let bodies = [body(&[])];
        let plan = place(decide(Some(20.0), Some(20.0), &bodies, space(100.0, true)));
        assert!(plan.header && plan.footer);
        assert!(plan.slices.is_empty());
        assert_eq!(plan.resume, None);
    }

    #[test]
    fn overflowing_header_kept_without_body_rows() {
        let bodies = [body(&[])];
        let plan = place(decide(Some(150.0), None, &bodies, space(100.0, true)));
        assert!(plan.header);
        assert_eq!(plan.resume, None);

        let decision = decide(Some(150.0), None, &bodies, space(60.0, false));
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn trailing_space_pushes_last_row_on() {
        let plans = paginate_with(None, None, &[body(&[40.0, 40.0])], 100.0, 100.0, false, 30.0);
        assert_eq!(counts(&plans), vec![1, 1]);
        assert_eq!(plans[0].resume, Some(Resume { group: 0, row: 1 }));
    }

    #[test]
    fn trailing_space_never_strands_a_forced_row() {
        let plans = paginate_with(None, None, &[body(&[90.0])], 100.0, 100.0, false, 30.0);
        assert_eq!(counts(&plans), vec![1]);
    }

    #[test]
    fn empty_groups_are_skipped() {
        let bodies = [body(&[]), body(&[10.0]), body(&[])];
        let plan = place(decide(None, None, &bodies, space(100.0, true)));
        assert_eq!(plan.slices, vec![(1, 0..1)]);
    }

    #[test]
    fn rows_appear_exactly_once() {
        let bodies = [
            body(&[30.0, 30.0, 30.0]),
            avoid(&[25.0, 25.0]),
            body(&[70.0, 10.0]),
        ];
        let plans = paginate(Some(10.0), None, &bodies, 50.0, 100.0, false);
        let mut seen = Vec::new();
        for plan in &plans {
            for (g, rows) in &plan.slices {
                seen.extend(rows.clone().map(|r| (*g, r)));
            }
        }
        let expected: Vec<(usize, usize)> =
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (2, 0), (2, 1)];
        assert_eq!(seen, expected);
    }
}
