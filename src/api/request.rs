//! Request types for the leave API.

use serde::{Deserialize, Serialize};

use crate::approval::LeaveDecision;
use crate::models::ApprovalState;

/// Approval state as named in query requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Not yet decided.
    Pending,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
}

impl From<StatusFilter> for ApprovalState {
    fn from(value: StatusFilter) -> Self {
        match value {
            StatusFilter::Pending => ApprovalState::Pending,
            StatusFilter::Approved => ApprovalState::Approved,
            StatusFilter::Rejected => ApprovalState::Rejected,
        }
    }
}

/// Request body for `POST /leaves/applications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationsRequest {
    /// Approver whose assigned records are listed.
    pub approver_name: String,
    /// Restricts the records to one state; absent lists every state.
    #[serde(default)]
    pub status: Option<StatusFilter>,
}

/// Request body for `POST /leaves/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequest {
    /// Owner of the records being decided.
    pub username: String,
    /// One decision per record.
    pub decisions: Vec<LeaveDecision>,
}

/// Request body for `POST /holidays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidaysRequest {
    /// Country code (e.g., "IN").
    pub country: String,
    /// Calendar year.
    pub year: i32,
}
