//! Configuration loading and management for the leave engine.
//!
//! This module provides functionality to load the service configuration
//! from YAML files, including service settings, the employee directory and
//! public holiday calendars.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/leave").unwrap();
//! println!("Holiday country: {}", config.service().country);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DirectoryConfig, EmployeeEntry, HolidayCalendar, LeaveConfig, ServiceConfig};
