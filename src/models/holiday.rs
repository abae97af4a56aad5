//! Public holiday reference data.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g., "Republic Day").
    pub name: String,
}

/// Key for a holiday lookup.
///
/// # Example
///
/// ```
/// use leave_engine::models::HolidayQuery;
/// use chrono::NaiveDate;
///
/// let query = HolidayQuery::for_date("IN", NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
/// assert_eq!(query, HolidayQuery::new("IN", 2026));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayQuery {
    /// Country code as used by the holiday source (e.g., "IN").
    pub country: String,
    /// Calendar year.
    pub year: i32,
}

impl HolidayQuery {
    /// Creates a query for a country and year.
    pub fn new(country: impl Into<String>, year: i32) -> Self {
        Self {
            country: country.into(),
            year,
        }
    }

    /// Creates a query for the year containing `date`.
    pub fn for_date(country: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(country, date.year())
    }
}
