//! Scoped read access to stored leave.
//!
//! Three scopes are offered: the caller's own leave, the leave of the
//! caller's team, and the leave awaiting (or decided by) an approver. Every
//! scope reports an empty result as [`ViewOutcome::NotFound`] rather than as
//! an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalState, Identity, LeaveDocument};
use crate::store::{Directory, DocumentStore, Filter, LEAVES_COLLECTION, Stage};

/// Result of a visibility query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "documents", rename_all = "snake_case")]
pub enum ViewOutcome {
    /// At least one leave document is visible.
    Found(Vec<LeaveDocument>),
    /// Nothing in scope.
    NotFound,
}

impl ViewOutcome {
    fn from_documents(documents: Vec<LeaveDocument>) -> Self {
        if documents.is_empty() {
            ViewOutcome::NotFound
        } else {
            ViewOutcome::Found(documents)
        }
    }

    /// The visible documents; empty for `NotFound`.
    pub fn documents(&self) -> &[LeaveDocument] {
        match self {
            ViewOutcome::Found(documents) => documents,
            ViewOutcome::NotFound => &[],
        }
    }

    /// Returns true if nothing is in scope.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewOutcome::NotFound)
    }
}

/// The identity a caller claims when asking for their team's leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamClaim {
    /// Username the caller claims to be.
    pub username: String,
    /// Team the caller claims to belong to.
    pub team: String,
}

fn parse_documents(values: Vec<Value>, operation: &str) -> EngineResult<Vec<LeaveDocument>> {
    values
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<LeaveDocument>, _>>()
        .map_err(|e| EngineError::Storage {
            operation: operation.to_string(),
            message: format!("malformed leave document: {}", e),
        })
}

/// All leave stored for the authenticated caller.
pub async fn self_view<S: DocumentStore>(
    store: &S,
    identity: &Identity,
) -> EngineResult<ViewOutcome> {
    let values = store
        .find(
            LEAVES_COLLECTION,
            &Filter::eq("username", identity.username.as_str()),
        )
        .await?;
    Ok(ViewOutcome::from_documents(parse_documents(values, "find")?))
}

/// All leave stored for members of the caller's team.
///
/// # Arguments
///
/// * `store` - The leave document store
/// * `directory` - Resolves the team's members
/// * `claim` - Username and team the caller claims
/// * `session` - Identity verified at login
///
/// # Returns
///
/// The leave documents of every team member, or `NotFound` when the team has
/// no members or none of them has a document.
///
/// # Errors
///
/// `Unauthorized` if the claimed username is not the session's user. The
/// team is always taken from `session`; a different claimed team is logged
/// and ignored.
pub async fn team_view<S, D>(
    store: &S,
    directory: &D,
    claim: &TeamClaim,
    session: &Identity,
) -> EngineResult<ViewOutcome>
where
    S: DocumentStore,
    D: Directory,
{
    if !session.is_same_user(&claim.username) {
        warn!(
            claimed = %claim.username,
            authenticated = %session.username,
            "Team view requested for another user"
        );
        return Err(EngineError::Unauthorized {
            reason: format!(
                "session belongs to '{}', not '{}'",
                session.username, claim.username
            ),
        });
    }
    if claim.team != session.team {
        warn!(
            username = %session.username,
            claimed_team = %claim.team,
            team = %session.team,
            "Claimed team differs from directory team"
        );
    }

    let members = directory.users_by_team(&session.team).await?;
    if members.is_empty() {
        return Ok(ViewOutcome::NotFound);
    }

    let usernames: Vec<String> = members.into_iter().map(|m| m.username).collect();
    debug!(team = %session.team, members = usernames.len(), "Resolved team members");

    let values = store
        .find(LEAVES_COLLECTION, &Filter::is_in("username", usernames))
        .await?;
    Ok(ViewOutcome::from_documents(parse_documents(values, "find")?))
}

/// Builds the aggregation pipeline for [`approver_view`].
///
/// The first stage keeps documents with at least one record for `approver`;
/// the second trims each document's records to that approver and, when
/// `status` is given, to records in that state.
pub fn approver_pipeline(approver: &str, status: Option<ApprovalState>) -> Vec<Stage> {
    let mut cond = vec![Filter::eq("approver", approver)];
    if let Some(state) = status {
        cond.push(Filter::eq("approved", Value::from(state.as_stored())));
    }

    vec![
        Stage::Match(Filter::elem_match("leaves", Filter::eq("approver", approver))),
        Stage::FilterArray {
            field: "leaves".to_string(),
            cond: Filter::And(cond),
        },
    ]
}

/// Leave records assigned to `approver`, optionally restricted to one state.
///
/// # Arguments
///
/// * `approver` - Username the records are assigned to
/// * `status` - Restricts the records to one state; `None` keeps all of them
///
/// Documents with no remaining record are left out.
pub async fn approver_view<S: DocumentStore>(
    store: &S,
    approver: &str,
    status: Option<ApprovalState>,
) -> EngineResult<ViewOutcome> {
    let values = store
        .aggregate(LEAVES_COLLECTION, &approver_pipeline(approver, status))
        .await?;

    let documents: Vec<LeaveDocument> = parse_documents(values, "aggregate")?
        .into_iter()
        .filter(|d| !d.leaves.is_empty())
        .collect();

    debug!(
        approver,
        status = ?status,
        documents = documents.len(),
        "Approver view resolved"
    );
    Ok(ViewOutcome::from_documents(documents))
}
