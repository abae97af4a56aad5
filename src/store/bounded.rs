//! Timeouts for collaborator calls.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use super::contracts::{Directory, DocumentStore, HolidaySource};
use super::query::{Filter, MatchResult, Stage, Update};
use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, HolidayQuery, Identity};

/// Wraps a collaborator so that every call is bounded by `limit`.
///
/// Dropping the returned future cancels the inner call, so a request that
/// goes away takes its storage work with it.
#[derive(Debug, Clone)]
pub struct Bounded<T> {
    inner: T,
    limit: Duration,
}

impl<T> Bounded<T> {
    /// Wraps `inner` with a per-call time limit.
    pub fn new(inner: T, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// The wrapped collaborator.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// The per-call time limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

/// Runs `call`, failing with `Timeout` if it does not finish within `limit`.
pub async fn within<F, R>(limit: Duration, operation: &str, call: F) -> EngineResult<R>
where
    F: Future<Output = EngineResult<R>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, limit_ms, "External call timed out");
            Err(EngineError::Timeout {
                operation: operation.to_string(),
                limit_ms,
            })
        }
    }
}

impl<T: DocumentStore> DocumentStore for Bounded<T> {
    async fn find(&self, collection: &str, filter: &Filter) -> EngineResult<Vec<Value>> {
        within(self.limit, "find", self.inner.find(collection, filter)).await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> EngineResult<MatchResult> {
        within(
            self.limit,
            "update_one",
            self.inner.update_one(collection, filter, update),
        )
        .await
    }

    async fn aggregate(&self, collection: &str, pipeline: &[Stage]) -> EngineResult<Vec<Value>> {
        within(
            self.limit,
            "aggregate",
            self.inner.aggregate(collection, pipeline),
        )
        .await
    }
}

impl<T: Directory> Directory for Bounded<T> {
    async fn users_by_team(&self, team: &str) -> EngineResult<Vec<Identity>> {
        within(self.limit, "users_by_team", self.inner.users_by_team(team)).await
    }

    async fn find_user(&self, username: &str) -> EngineResult<Option<Identity>> {
        within(self.limit, "find_user", self.inner.find_user(username)).await
    }
}

impl<T: HolidaySource> HolidaySource for Bounded<T> {
    async fn holidays_of(&self, query: &HolidayQuery) -> EngineResult<Vec<Holiday>> {
        within(self.limit, "holidays_of", self.inner.holidays_of(query)).await
    }
}
