//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the leave
//! engine configuration from YAML files.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::calendar::WeekendPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, HolidayQuery, Identity};
use crate::store::{Directory, HolidaySource};

use super::types::{DirectoryConfig, HolidayCalendar, LeaveConfig, ServiceConfig};

/// Loads and provides access to the leave engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory. Since
/// the directory and the holiday calendars are read-only reference data, the
/// loader doubles as the default [`Directory`] and [`HolidaySource`].
///
/// # Directory Structure
///
/// ```text
/// config/leave/
/// ├── service.yaml     # Holiday country, weekend days, timeouts
/// ├── directory.yaml   # Employees with team and approver
/// └── holidays/
///     └── in-2026.yaml # One holiday calendar per country and year
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/leave").unwrap();
///
/// let asha = loader.get_employee("asha").unwrap();
/// println!("{} is approved by {}", asha.username, asha.approver_name);
///
/// for holiday in loader.get_holidays("IN", 2026) {
///     println!("{}: {}", holiday.date, holiday.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LeaveConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The holidays directory contains no calendars
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let service = Self::load_yaml::<ServiceConfig>(&path.join("service.yaml"))?;
        let directory = Self::load_yaml::<DirectoryConfig>(&path.join("directory.yaml"))?;
        let calendars = Self::load_calendars(&path.join("holidays"))?;

        debug!(
            employees = directory.employees.len(),
            calendars = calendars.len(),
            "Loaded leave configuration"
        );

        Ok(Self {
            config: LeaveConfig::new(service, directory, calendars),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all holiday calendars from the holidays directory.
    fn load_calendars(holidays_dir: &Path) -> EngineResult<Vec<HolidayCalendar>> {
        let holidays_dir_str = holidays_dir.display().to_string();

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: holidays_dir_str.clone(),
        })?;

        let mut calendars = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: holidays_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                calendars.push(Self::load_yaml::<HolidayCalendar>(&path)?);
            }
        }

        if calendars.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no holiday calendars found)", holidays_dir_str),
            });
        }

        Ok(calendars)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &LeaveConfig {
        &self.config
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        self.config.service()
    }

    /// Returns the configured weekend days.
    pub fn weekend(&self) -> &WeekendPolicy {
        &self.config.service().weekend
    }

    /// Returns the per-call limit for external collaborators.
    pub fn external_call_timeout(&self) -> Duration {
        Duration::from_millis(self.config.service().external_call_timeout_ms)
    }

    /// Returns how long a session stays valid.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.config.service().session_ttl_minutes)
    }

    /// Gets an employee by username.
    pub fn get_employee(&self, username: &str) -> Option<&Identity> {
        self.config.employees().get(username)
    }

    /// Returns the usernames of every known employee.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.config.employees().keys().map(String::as_str)
    }

    /// Gets every employee of a team, ordered by username.
    pub fn get_team(&self, team: &str) -> Vec<Identity> {
        let mut members: Vec<Identity> = self
            .config
            .employees()
            .values()
            .filter(|e| e.team == team)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.username.cmp(&b.username));
        members
    }

    /// Gets the holidays for a country and year.
    ///
    /// Returns an empty list when no calendar is configured for that pair.
    pub fn get_holidays(&self, country: &str, year: i32) -> Vec<Holiday> {
        self.config
            .calendar(country, year)
            .map(<[Holiday]>::to_vec)
            .unwrap_or_default()
    }
}

impl Directory for ConfigLoader {
    async fn users_by_team(&self, team: &str) -> EngineResult<Vec<Identity>> {
        Ok(self.get_team(team))
    }

    async fn find_user(&self, username: &str) -> EngineResult<Option<Identity>> {
        Ok(self.get_employee(username).cloned())
    }
}

impl HolidaySource for ConfigLoader {
    async fn holidays_of(&self, query: &HolidayQuery) -> EngineResult<Vec<Holiday>> {
        Ok(self.get_holidays(&query.country, query.year))
    }
}
