//! Persisted leave records and their approval state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::interval::LeaveInterval;
use crate::error::{EngineError, EngineResult};

/// Approval state of a single leave record.
///
/// `Pending` is the only non-terminal state. On the wire and in storage the
/// state is an optional boolean: `null` while pending, then `true` or `false`.
///
/// # Example
///
/// ```
/// use leave_engine::models::ApprovalState;
///
/// let decided = ApprovalState::Pending.decide(true).unwrap();
/// assert_eq!(decided, ApprovalState::Approved);
/// assert!(decided.decide(false).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum ApprovalState {
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Approved by the designated approver.
    Approved,
    /// Rejected by the designated approver.
    Rejected,
}

impl ApprovalState {
    /// Applies an approver's decision.
    ///
    /// Only `Pending` can transition; deciding an already decided record fails
    /// with a validation error.
    pub fn decide(self, approve: bool) -> EngineResult<ApprovalState> {
        match self {
            ApprovalState::Pending if approve => Ok(ApprovalState::Approved),
            ApprovalState::Pending => Ok(ApprovalState::Rejected),
            decided => Err(EngineError::Validation {
                message: format!("leave is already {}", decided),
            }),
        }
    }

    /// Returns true for `Approved` and `Rejected`.
    pub fn is_terminal(self) -> bool {
        self != ApprovalState::Pending
    }

    /// The stored representation of this state.
    pub fn as_stored(self) -> Option<bool> {
        self.into()
    }
}

impl From<Option<bool>> for ApprovalState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ApprovalState::Pending,
            Some(true) => ApprovalState::Approved,
            Some(false) => ApprovalState::Rejected,
        }
    }
}

impl From<ApprovalState> for Option<bool> {
    fn from(value: ApprovalState) -> Self {
        match value {
            ApprovalState::Pending => None,
            ApprovalState::Approved => Some(true),
            ApprovalState::Rejected => Some(false),
        }
    }
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalState::Pending => write!(f, "pending"),
            ApprovalState::Approved => write!(f, "approved"),
            ApprovalState::Rejected => write!(f, "rejected"),
        }
    }
}

/// One atomic, persisted leave span.
///
/// After decomposition the interval contains no holiday and no weekend day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Identifier assigned at creation.
    pub id: Uuid,
    /// The leave days covered by this record.
    #[serde(flatten)]
    pub interval: LeaveInterval,
    /// Approval state; pending until the approver decides.
    #[serde(default)]
    pub approved: ApprovalState,
    /// Username of the designated approver.
    pub approver: String,
}

impl LeaveRecord {
    /// Creates a pending record with a fresh identifier.
    pub fn pending(interval: LeaveInterval, approver: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            interval,
            approved: ApprovalState::Pending,
            approver: approver.into(),
        }
    }
}
