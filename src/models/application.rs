//! Leave applications and the per-user leave document.

use serde::{Deserialize, Serialize};

use super::interval::RequestedInterval;
use super::leave_record::LeaveRecord;

/// A submitted request for leave, before decomposition.
///
/// Never stored in this shape; it is expanded into [`LeaveRecord`]s first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// The employee applying for leave.
    pub username: String,
    /// Requested intervals in submission order.
    pub leaves: Vec<RequestedInterval>,
}

/// All stored leave of one employee, as held in the `leaves` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDocument {
    /// The employee the records belong to.
    pub username: String,
    /// Records in the order they were appended.
    #[serde(default)]
    pub leaves: Vec<LeaveRecord>,
}

impl LeaveDocument {
    /// An empty document for a newly provisioned employee.
    pub fn empty(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            leaves: Vec::new(),
        }
    }

    /// Finds a record by id.
    pub fn record(&self, id: uuid::Uuid) -> Option<&LeaveRecord> {
        self.leaves.iter().find(|r| r.id == id)
    }
}
