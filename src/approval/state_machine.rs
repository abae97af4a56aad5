//! Approval of stored leave records.
//!
//! A record moves from pending to approved or rejected exactly once. The
//! update filter only matches pending records, so the store's per-document
//! atomicity makes the first decision on a record win.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalState, LeaveDocument};
use crate::store::{DocumentStore, Filter, LEAVES_COLLECTION, MatchResult, Update};

/// An approver's decision on one leave record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDecision {
    /// The record being decided.
    pub leave_id: Uuid,
    /// `true` to approve, `false` to reject.
    pub approved: bool,
}

/// What happened to one decision of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApprovalOutcome {
    /// The record was pending and now holds the decision.
    Applied {
        /// The new state.
        state: ApprovalState,
    },
    /// The record had already been decided; it was left unchanged.
    AlreadyDecided {
        /// The state the record keeps.
        state: ApprovalState,
    },
    /// The user has no record with this id.
    NotFound,
}

/// Per-record result of [`approve_each`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalReport {
    /// The record the decision was about.
    pub leave_id: Uuid,
    /// What happened.
    #[serde(flatten)]
    pub outcome: ApprovalOutcome,
}

fn pending_record(leave_id: Uuid) -> Filter {
    Filter::And(vec![
        Filter::eq("id", leave_id.to_string()),
        Filter::eq("approved", Value::Null),
    ])
}

/// Decides the pending record `leave_id` stored for `username`.
///
/// Only the named record is touched. Returns the store's match counts: zero
/// when the user has no such record or it is no longer pending.
pub async fn approve<S: DocumentStore>(
    store: &S,
    username: &str,
    leave_id: Uuid,
    approved: bool,
) -> EngineResult<MatchResult> {
    let target = ApprovalState::Pending.decide(approved)?;

    let filter = Filter::And(vec![
        Filter::eq("username", username),
        Filter::elem_match("leaves", pending_record(leave_id)),
    ]);
    let update = Update::SetFirstMatch {
        array: "leaves".to_string(),
        element: pending_record(leave_id),
        field: "approved".to_string(),
        value: Value::from(target.as_stored()),
    };

    let result = store
        .update_one(LEAVES_COLLECTION, &filter, &update)
        .await?;

    debug!(
        username,
        %leave_id,
        state = %target,
        matched = result.matched_count,
        "Approval update applied"
    );
    Ok(result)
}

/// Finds why a decision matched nothing.
async fn classify_unmatched<S: DocumentStore>(
    store: &S,
    username: &str,
    leave_id: Uuid,
) -> EngineResult<ApprovalOutcome> {
    let documents = store
        .find(LEAVES_COLLECTION, &Filter::eq("username", username))
        .await?;

    for document in documents {
        let document: LeaveDocument =
            serde_json::from_value(document).map_err(|e| EngineError::Storage {
                operation: "find".to_string(),
                message: format!("malformed leave document: {}", e),
            })?;
        if let Some(record) = document.record(leave_id) {
            return Ok(ApprovalOutcome::AlreadyDecided {
                state: record.approved,
            });
        }
    }

    Ok(ApprovalOutcome::NotFound)
}

/// Applies every decision independently, in order.
///
/// # Arguments
///
/// * `store` - The store holding the leave documents
/// * `username` - Owner of the records being decided
/// * `decisions` - One entry per record; ids may repeat
///
/// # Returns
///
/// One [`ApprovalReport`] per decision, in input order. An empty batch is a
/// validation error. A store failure stops the batch; decisions applied
/// before it stay applied.
pub async fn approve_each<S: DocumentStore>(
    store: &S,
    username: &str,
    decisions: &[LeaveDecision],
) -> EngineResult<Vec<ApprovalReport>> {
    if decisions.is_empty() {
        return Err(EngineError::Validation {
            message: "no leave decisions supplied".to_string(),
        });
    }

    let mut reports = Vec::with_capacity(decisions.len());
    for decision in decisions {
        let result = approve(store, username, decision.leave_id, decision.approved).await?;
        let outcome = if result.matched_count > 0 {
            ApprovalOutcome::Applied {
                state: ApprovalState::Pending.decide(decision.approved)?,
            }
        } else {
            classify_unmatched(store, username, decision.leave_id).await?
        };
        reports.push(ApprovalReport {
            leave_id: decision.leave_id,
            outcome,
        });
    }

    let applied = reports
        .iter()
        .filter(|r| matches!(r.outcome, ApprovalOutcome::Applied { .. }))
        .count();
    info!(
        username,
        decisions = decisions.len(),
        applied,
        "Leave decisions processed"
    );

    Ok(reports)
}
