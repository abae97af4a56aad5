//! Contracts for the external collaborators the engine depends on.
//!
//! Every method returns a `Send` future so handlers stay spawnable on a
//! multi-threaded runtime.

use std::future::Future;

use serde_json::Value;

use super::query::{Filter, MatchResult, Stage, Update};
use crate::error::EngineResult;
use crate::models::{Holiday, HolidayQuery, Identity};

/// Collection holding one [`crate::models::LeaveDocument`] per employee.
pub const LEAVES_COLLECTION: &str = "leaves";

/// A document store offering find, single-document update and aggregation.
///
/// Implementations must apply `update_one` atomically per document.
pub trait DocumentStore: Send + Sync {
    /// Returns every document in `collection` matching `filter`.
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> impl Future<Output = EngineResult<Vec<Value>>> + Send;

    /// Applies `update` to the first document matching `filter`.
    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> impl Future<Output = EngineResult<MatchResult>> + Send;

    /// Runs `pipeline` over the documents of `collection`.
    fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Stage],
    ) -> impl Future<Output = EngineResult<Vec<Value>>> + Send;
}

/// Organisational directory of employees.
pub trait Directory: Send + Sync {
    /// All employees belonging to `team`.
    fn users_by_team(&self, team: &str) -> impl Future<Output = EngineResult<Vec<Identity>>> + Send;

    /// The employee with `username`, if any.
    fn find_user(&self, username: &str)
    -> impl Future<Output = EngineResult<Option<Identity>>> + Send;
}

/// Source of public holiday dates.
pub trait HolidaySource: Send + Sync {
    /// Holidays for a country and year. An unknown country or year yields an
    /// empty list; only an unreachable source is an error.
    fn holidays_of(
        &self,
        query: &HolidayQuery,
    ) -> impl Future<Output = EngineResult<Vec<Holiday>>> + Send;
}
