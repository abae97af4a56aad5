//! Error types for the leave engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while decomposing, approving
//! or viewing leave.
//!
//! "Nothing matched" is deliberately absent from this enum: empty views and
//! unknown leave ids are reported as outcomes, not failures.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the leave engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::InvalidRange {
///     start: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
///     end: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
/// };
/// assert_eq!(error.to_string(), "Invalid leave range: 2026-03-06 is after 2026-03-02");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A requested interval ends before it starts.
    #[error("Invalid leave range: {start} is after {end}")]
    InvalidRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// Input was malformed or semantically invalid.
    #[error("Validation error: {message}")]
    Validation {
        /// A description of what was invalid.
        message: String,
    },

    /// The holiday source could not answer a lookup.
    #[error("Holiday lookup failed for {country}/{year}: {message}")]
    HolidayLookupFailure {
        /// The country that was queried.
        country: String,
        /// The year that was queried.
        year: i32,
        /// A description of the failure.
        message: String,
    },

    /// The caller is authenticated but may not perform the operation.
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why access was denied.
        reason: String,
    },

    /// No valid session or identity accompanies the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The document store failed.
    #[error("Storage operation '{operation}' failed: {message}")]
    Storage {
        /// The storage operation that failed (find, update_one, ...).
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// The employee directory failed.
    #[error("Directory lookup failed: {message}")]
    Directory {
        /// A description of the failure.
        message: String,
    },

    /// An external call did not complete in time.
    #[error("Operation '{operation}' timed out after {limit_ms}ms")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The limit that was exceeded, in milliseconds.
        limit_ms: u64,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the error came from a collaborator (store, directory,
    /// holiday source) rather than from the caller's input.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            EngineError::HolidayLookupFailure { .. }
                | EngineError::Storage { .. }
                | EngineError::Directory { .. }
                | EngineError::Timeout { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
