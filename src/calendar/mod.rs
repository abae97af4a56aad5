//! Calendar logic for leave decomposition.
//!
//! This module contains the calendar filter that splits a date range around
//! excluded days, the weekend policy used for the second filtering pass, and
//! a per-day classification.

mod day_type;
mod filter;
mod weekend;

pub use day_type::DayType;
pub use filter::{filter_excluded, split_excluding};
pub use weekend::WeekendPolicy;
