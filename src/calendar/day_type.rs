//! Day classification.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::weekend::WeekendPolicy;

/// Represents how a calendar day counts towards leave.
///
/// A holiday that falls on a weekend is classified as `Holiday`; either way
/// it is not a leave day.
///
/// # Example
///
/// ```
/// use leave_engine::calendar::{DayType, WeekendPolicy};
/// use chrono::NaiveDate;
/// use std::collections::HashSet;
///
/// let saturday = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// let day_type = DayType::classify(saturday, &HashSet::new(), &WeekendPolicy::default());
/// assert_eq!(day_type, DayType::Weekend);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// A working day; counts as leave.
    BusinessDay,
    /// A configured weekend day.
    Weekend,
    /// A public holiday.
    Holiday,
}

impl DayType {
    /// Classifies `date` against a holiday set and a weekend policy.
    pub fn classify(
        date: NaiveDate,
        holidays: &HashSet<NaiveDate>,
        weekend: &WeekendPolicy,
    ) -> DayType {
        if holidays.contains(&date) {
            DayType::Holiday
        } else if weekend.is_weekend(date) {
            DayType::Weekend
        } else {
            DayType::BusinessDay
        }
    }

    /// Returns true for days that count as leave.
    pub fn is_business_day(self) -> bool {
        self == DayType::BusinessDay
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::BusinessDay => write!(f, "business day"),
            DayType::Weekend => write!(f, "weekend"),
            DayType::Holiday => write!(f, "holiday"),
        }
    }
}
