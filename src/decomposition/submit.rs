//! Persisting decomposed applications.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::engine::{LeavePolicy, decompose};
use crate::error::{EngineError, EngineResult};
use crate::models::{Identity, LeaveApplication, LeaveRecord};
use crate::store::{DocumentStore, Filter, HolidaySource, LEAVES_COLLECTION, MatchResult, Update};

/// Outcome of a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Records appended to the submitter's leave document.
    pub records: Vec<LeaveRecord>,
    /// Store result; `matched_count == 0` means the submitter has no leave
    /// document.
    pub result: MatchResult,
}

impl Submission {
    /// Returns true if the submitter's leave document exists.
    pub fn user_found(&self) -> bool {
        self.result.matched_count > 0
    }
}

/// Decomposes an application and appends the resulting records to the
/// submitter's leave document in one update.
///
/// # Arguments
///
/// * `store` - Receives the new records
/// * `holidays` - Holiday source used during decomposition
/// * `policy` - Country and weekend rules
/// * `submitter` - The authenticated user; must be the application's user
/// * `application` - The requested intervals
///
/// # Returns
///
/// The stored records and the store's match counts. Nothing is written
/// unless the whole application decomposes successfully.
pub async fn submit_application<S, H>(
    store: &S,
    holidays: &H,
    policy: &LeavePolicy,
    submitter: &Identity,
    application: &LeaveApplication,
) -> EngineResult<Submission>
where
    S: DocumentStore,
    H: HolidaySource,
{
    if !submitter.is_same_user(&application.username) {
        warn!(
            submitter = %submitter.username,
            applicant = %application.username,
            "Application submitted on behalf of another user"
        );
        return Err(EngineError::Unauthorized {
            reason: format!(
                "'{}' cannot apply for leave on behalf of '{}'",
                submitter.username, application.username
            ),
        });
    }

    let records = decompose(application, submitter, policy, holidays).await?;

    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(|e| EngineError::Storage {
            operation: "update_one".to_string(),
            message: e.to_string(),
        })?;

    let result = store
        .update_one(
            LEAVES_COLLECTION,
            &Filter::eq("username", application.username.as_str()),
            &Update::PushEach {
                field: "leaves".to_string(),
                values,
            },
        )
        .await?;

    info!(
        username = %application.username,
        records = records.len(),
        matched = result.matched_count,
        "Leave application stored"
    );

    Ok(Submission { records, result })
}
