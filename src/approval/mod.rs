//! Approval state machine for stored leave records.

mod state_machine;

pub use state_machine::{ApprovalOutcome, ApprovalReport, LeaveDecision, approve, approve_each};
