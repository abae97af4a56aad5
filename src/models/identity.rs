//! Verified identities.

use serde::{Deserialize, Serialize};

/// A verified employee together with their organisational attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Unique login name.
    pub username: String,
    /// Team the employee belongs to.
    pub team: String,
    /// Username of the employee's leave approver.
    pub approver_name: String,
}

impl Identity {
    /// Creates an identity.
    pub fn new(
        username: impl Into<String>,
        team: impl Into<String>,
        approver_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            team: team.into(),
            approver_name: approver_name.into(),
        }
    }

    /// Returns true if `username` names this user.
    pub fn is_same_user(&self, username: &str) -> bool {
        self.username == username
    }
}
