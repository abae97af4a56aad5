//! Calendar filter.
//!
//! Splits a leave interval into the contiguous runs of days that survive an
//! exclusion rule (holidays, weekend days, ...).

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::LeaveInterval;

/// Splits `interval` into maximal runs of days for which `is_excluded`
/// returns false.
///
/// # Behavior
///
/// - No excluded day: returns exactly `[interval]`
/// - Every day excluded: returns an empty vector
/// - Consecutive excluded days produce a single gap
/// - Output is in chronological order and never contains an excluded day
///
/// # Example
///
/// ```
/// use leave_engine::calendar::split_excluding;
/// use leave_engine::models::LeaveInterval;
/// use chrono::NaiveDate;
///
/// let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
/// let week = LeaveInterval::new(date(2), date(6)).unwrap();
///
/// // Wednesday 2026-03-04 excluded
/// let parts = split_excluding(&week, |d| d == date(4));
/// assert_eq!(parts.len(), 2);
/// assert_eq!((parts[0].start(), parts[0].end()), (date(2), date(3)));
/// assert_eq!((parts[1].start(), parts[1].end()), (date(5), date(6)));
/// ```
pub fn split_excluding<F>(interval: &LeaveInterval, is_excluded: F) -> Vec<LeaveInterval>
where
    F: Fn(NaiveDate) -> bool,
{
    let mut runs = Vec::new();
    let mut run: Option<(NaiveDate, NaiveDate)> = None;

    for day in interval.days() {
        if is_excluded(day) {
            if let Some((start, end)) = run.take() {
                runs.push(LeaveInterval::spanning(start, end));
            }
        } else {
            run = Some(match run {
                Some((start, _)) => (start, day),
                None => (day, day),
            });
        }
    }

    if let Some((start, end)) = run {
        runs.push(LeaveInterval::spanning(start, end));
    }

    runs
}

/// Splits `interval` around every date in `excluded`.
///
/// Dates in `excluded` outside the interval have no effect.
pub fn filter_excluded(interval: &LeaveInterval, excluded: &HashSet<NaiveDate>) -> Vec<LeaveInterval> {
    if excluded.is_empty() {
        return vec![*interval];
    }
    split_excluding(interval, |day| excluded.contains(&day))
}
