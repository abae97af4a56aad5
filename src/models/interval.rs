//! Leave interval models.
//!
//! [`RequestedInterval`] is what arrives on the wire and may be inverted;
//! [`LeaveInterval`] is the validated form the calendar code works with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A date range exactly as submitted, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedInterval {
    /// The first requested day (inclusive).
    pub start_date: NaiveDate,
    /// The last requested day (inclusive).
    pub end_date: NaiveDate,
}

impl RequestedInterval {
    /// Creates a requested interval without validating it.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Validates the interval, failing with `InvalidRange` if it is inverted.
    pub fn validate(&self) -> EngineResult<LeaveInterval> {
        LeaveInterval::new(self.start_date, self.end_date)
    }
}

/// A closed, inclusive range of calendar dates with `start <= end`.
///
/// The fields are private so the ordering invariant cannot be broken after
/// construction.
///
/// # Example
///
/// ```
/// use leave_engine::models::LeaveInterval;
/// use chrono::NaiveDate;
///
/// let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let friday = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
///
/// let week = LeaveInterval::new(monday, friday).unwrap();
/// assert_eq!(week.day_count(), 5);
/// assert!(LeaveInterval::new(friday, monday).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RequestedInterval", into = "RequestedInterval")]
pub struct LeaveInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl LeaveInterval {
    /// Creates an interval, failing with `InvalidRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates an interval from bounds the caller has already ordered.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`. Reaching that is a bug in the caller, not bad
    /// input.
    pub(crate) fn spanning(start: NaiveDate, end: NaiveDate) -> Self {
        assert!(
            start <= end,
            "inverted leave interval {start}..={end} constructed internally"
        );
        Self { start, end }
    }

    /// A one-day interval.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The first day of the interval.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day of the interval.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, including both ends.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }


    /// Iterates every date in the interval in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

impl TryFrom<RequestedInterval> for LeaveInterval {
    type Error = EngineError;

    fn try_from(value: RequestedInterval) -> Result<Self, Self::Error> {
        value.validate()
    }
}

impl From<LeaveInterval> for RequestedInterval {
    fn from(value: LeaveInterval) -> Self {
        RequestedInterval::new(value.start, value.end)
    }
}

impl std::fmt::Display for LeaveInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
