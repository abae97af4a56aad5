//! Leave decomposition.
//!
//! Turns requested intervals into atomic leave records containing only
//! business days: every interval is first split around public holidays, then
//! each remaining piece is split around weekend days.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::calendar::{WeekendPolicy, filter_excluded, split_excluding};
use crate::config::ServiceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    HolidayQuery, Identity, LeaveApplication, LeaveInterval, LeaveRecord, RequestedInterval,
};
use crate::store::HolidaySource;

/// Calendar rules applied during decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeavePolicy {
    /// Country whose holidays are excluded.
    pub country: String,
    /// Weekend days excluded in the second pass.
    pub weekend: WeekendPolicy,
}

impl LeavePolicy {
    /// Creates a policy for a country and weekend.
    pub fn new(country: impl Into<String>, weekend: WeekendPolicy) -> Self {
        Self {
            country: country.into(),
            weekend,
        }
    }
}

impl From<&ServiceConfig> for LeavePolicy {
    fn from(service: &ServiceConfig) -> Self {
        Self::new(&service.country, service.weekend.clone())
    }
}

/// Splits one interval into business-day-only sub-intervals.
///
/// # Example
///
/// ```
/// use leave_engine::calendar::WeekendPolicy;
/// use leave_engine::decomposition::decompose_interval;
/// use leave_engine::models::LeaveInterval;
/// use chrono::NaiveDate;
/// use std::collections::HashSet;
///
/// let date = |m, d| NaiveDate::from_ymd_opt(2026, m, d).unwrap();
///
/// // Friday 2026-01-16 to Monday 2026-01-19
/// let long_weekend = LeaveInterval::new(date(1, 16), date(1, 19)).unwrap();
/// let parts = decompose_interval(&long_weekend, &HashSet::new(), &WeekendPolicy::default());
///
/// assert_eq!(parts, vec![
///     LeaveInterval::single_day(date(1, 16)),
///     LeaveInterval::single_day(date(1, 19)),
/// ]);
/// ```
pub fn decompose_interval(
    interval: &LeaveInterval,
    holidays: &HashSet<NaiveDate>,
    weekend: &WeekendPolicy,
) -> Vec<LeaveInterval> {
    filter_excluded(interval, holidays)
        .iter()
        .flat_map(|holiday_free| split_excluding(holiday_free, |day| weekend.is_weekend(day)))
        .collect()
}

/// Validates every requested interval before any work is done.
fn validate_all(requested: &[RequestedInterval]) -> EngineResult<Vec<LeaveInterval>> {
    requested.iter().map(RequestedInterval::validate).collect()
}

/// Decomposes an application into pending leave records.
///
/// Holidays are looked up once per calendar year, for the policy's country.
/// Each requested interval is filtered with the holidays of the year its
/// **start date** falls in; an interval crossing New Year does not see the
/// following year's holidays.
///
/// # Arguments
///
/// * `application` - The requested intervals, in the order they were sent
/// * `submitter` - Identity whose approver is assigned to every record
/// * `policy` - Holiday country and weekend days
/// * `holidays` - Source queried for each distinct start year
///
/// # Returns
///
/// Pending records in request order, each covering business days only.
///
/// # Errors
///
/// - `InvalidRange` if any requested interval is inverted
/// - `HolidayLookupFailure` if the holiday source fails for any year
///
/// Either error aborts the whole application.
pub async fn decompose<H: HolidaySource>(
    application: &LeaveApplication,
    submitter: &Identity,
    policy: &LeavePolicy,
    holidays: &H,
) -> EngineResult<Vec<LeaveRecord>> {
    let intervals = validate_all(&application.leaves)?;

    let mut by_year: HashMap<i32, HashSet<NaiveDate>> = HashMap::new();
    for interval in &intervals {
        let query = HolidayQuery::for_date(&policy.country, interval.start());
        let year = query.year;
        if by_year.contains_key(&year) {
            continue;
        }
        let dates = holidays
            .holidays_of(&query)
            .await
            .map_err(|e| {
                warn!(country = %policy.country, year, error = %e, "Holiday lookup failed");
                EngineError::HolidayLookupFailure {
                    country: policy.country.clone(),
                    year,
                    message: e.to_string(),
                }
            })?
            .into_iter()
            .map(|h| h.date)
            .collect();
        by_year.insert(year, dates);
    }

    let mut records = Vec::new();
    for interval in &intervals {
        let year_holidays = &by_year[&interval.start().year()];
        records.extend(
            decompose_interval(interval, year_holidays, &policy.weekend)
                .into_iter()
                .map(|part| LeaveRecord::pending(part, &submitter.approver_name)),
        );
    }

    debug!(
        username = %application.username,
        requested = intervals.len(),
        records = records.len(),
        "Decomposed leave application"
    );

    Ok(records)
}
