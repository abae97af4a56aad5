//! Weekend detection.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// The days of the week that are never counted as leave.
///
/// # Example
///
/// ```
/// use leave_engine::calendar::WeekendPolicy;
/// use chrono::NaiveDate;
///
/// let policy = WeekendPolicy::default();
/// // 2026-01-17 is a Saturday
/// assert!(policy.is_weekend(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()));
/// // 2026-01-19 is a Monday
/// assert!(!policy.is_weekend(NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekendPolicy {
    days: Vec<Weekday>,
}

impl WeekendPolicy {
    /// A policy treating the given weekdays as weekend.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        Self { days }
    }

    /// Returns true if `date` falls on a weekend day.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday())
    }

    /// The configured weekend days, Monday-first.
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }
}

impl From<Vec<Weekday>> for WeekendPolicy {
    fn from(days: Vec<Weekday>) -> Self {
        Self::new(days)
    }
}

impl From<WeekendPolicy> for Vec<Weekday> {
    fn from(policy: WeekendPolicy) -> Self {
        policy.days
    }
}

impl Default for WeekendPolicy {
    fn default() -> Self {
        Self::new([Weekday::Sat, Weekday::Sun])
    }
}
