//! Configuration types for the leave engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use serde::Deserialize;

use crate::calendar::WeekendPolicy;
use crate::models::{Holiday, Identity};

/// Service settings from `service.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Country whose holidays are excluded from submitted leave (e.g., "IN").
    pub country: String,
    /// Days of the week never counted as leave.
    #[serde(default)]
    pub weekend: WeekendPolicy,
    /// Upper bound for every store, directory and holiday call.
    #[serde(default = "default_timeout_ms")]
    pub external_call_timeout_ms: u64,
    /// How long a session stays valid after login.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_session_ttl() -> i64 {
    480
}

/// An employee entry in `directory.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeEntry {
    /// Unique login name.
    pub username: String,
    /// Team the employee belongs to.
    pub team: String,
    /// Username of the employee's leave approver.
    pub approver_name: String,
}

impl From<&EmployeeEntry> for Identity {
    fn from(entry: &EmployeeEntry) -> Self {
        Identity::new(&entry.username, &entry.team, &entry.approver_name)
    }
}

/// Directory configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// All known employees.
    pub employees: Vec<EmployeeEntry>,
}

/// One holiday calendar file from the `holidays/` directory.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// Country code the calendar applies to.
    pub country: String,
    /// Calendar year.
    pub year: i32,
    /// Holidays in that year.
    pub holidays: Vec<Holiday>,
}

/// The complete configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct LeaveConfig {
    service: ServiceConfig,
    /// Employees keyed by username.
    employees: HashMap<String, Identity>,
    /// Holiday calendars keyed by (country, year).
    calendars: HashMap<(String, i32), Vec<Holiday>>,
}

impl LeaveConfig {
    /// Creates a new LeaveConfig from its component parts.
    ///
    /// Calendars for the same country and year are merged, and every
    /// calendar is sorted by date.
    pub fn new(
        service: ServiceConfig,
        directory: DirectoryConfig,
        calendars: Vec<HolidayCalendar>,
    ) -> Self {
        let employees = directory
            .employees
            .iter()
            .map(|e| (e.username.clone(), Identity::from(e)))
            .collect();

        let mut by_key: HashMap<(String, i32), Vec<Holiday>> = HashMap::new();
        for calendar in calendars {
            by_key
                .entry((calendar.country.to_uppercase(), calendar.year))
                .or_default()
                .extend(calendar.holidays);
        }
        for holidays in by_key.values_mut() {
            holidays.sort_by_key(|h| h.date);
        }

        Self {
            service,
            employees,
            calendars: by_key,
        }
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// Returns all employees keyed by username.
    pub fn employees(&self) -> &HashMap<String, Identity> {
        &self.employees
    }

    /// Returns the holidays for a country and year, if a calendar exists.
    pub fn calendar(&self, country: &str, year: i32) -> Option<&[Holiday]> {
        self.calendars
            .get(&(country.to_uppercase(), year))
            .map(Vec::as_slice)
    }
}
