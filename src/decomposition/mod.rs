//! Leave decomposition engine.
//!
//! Expands a leave application into atomic, business-day-only leave records
//! and appends them to the applicant's stored leave.

mod engine;
mod submit;

pub use engine::{LeavePolicy, decompose, decompose_interval};
pub use submit::{Submission, submit_application};
