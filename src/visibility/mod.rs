//! Visibility and authorization for leave queries.

mod views;

pub use views::{
    TeamClaim, ViewOutcome, approver_pipeline, approver_view, self_view, team_view,
};
