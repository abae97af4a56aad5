//! Core data models for the leave engine.
//!
//! This module contains all the domain models used throughout the engine.

mod application;
mod holiday;
mod identity;
mod interval;
mod leave_record;

pub use application::{LeaveApplication, LeaveDocument};
pub use holiday::{Holiday, HolidayQuery};
pub use identity::Identity;
pub use interval::{LeaveInterval, RequestedInterval};
pub use leave_record::{ApprovalState, LeaveRecord};
