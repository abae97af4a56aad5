//! In-process document store.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::contracts::{DocumentStore, LEAVES_COLLECTION};
use super::query::{Filter, MatchResult, Stage, Update};
use crate::error::{EngineError, EngineResult};
use crate::models::LeaveDocument;

/// A document store kept in memory.
///
/// Every `update_one` runs under the write lock, so updates to a single
/// document never interleave.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document into `collection`.
    pub async fn insert_one(&self, collection: &str, document: Value) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Creates an empty leave document for every username that has none yet.
    ///
    /// Returns the number of documents created.
    pub async fn provision_leave_documents<I, S>(&self, usernames: I) -> EngineResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collections = self.collections.write().await;
        let leaves = collections
            .entry(LEAVES_COLLECTION.to_string())
            .or_default();

        let mut created = 0;
        for username in usernames {
            let username = username.into();
            let exists = Filter::eq("username", username.as_str());
            if leaves.iter().any(|d| exists.matches(d)) {
                continue;
            }
            let document =
                serde_json::to_value(LeaveDocument::empty(username)).map_err(|e| {
                    EngineError::Storage {
                        operation: "insert_one".to_string(),
                        message: e.to_string(),
                    }
                })?;
            leaves.push(document);
            created += 1;
        }

        debug!(created, "Provisioned leave documents");
        Ok(created)
    }
}

impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> EngineResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> EngineResult<MatchResult> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(MatchResult::default());
        };

        let modified = update
            .apply(document)
            .map_err(|message| EngineError::Storage {
                operation: "update_one".to_string(),
                message,
            })?;

        Ok(MatchResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn aggregate(&self, collection: &str, pipeline: &[Stage]) -> EngineResult<Vec<Value>> {
        let documents = {
            let collections = self.collections.read().await;
            collections.get(collection).cloned().unwrap_or_default()
        };
        Ok(pipeline
            .iter()
            .fold(documents, |documents, stage| stage.run(documents)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_one(
                LEAVES_COLLECTION,
                json!({"username": "asha", "leaves": [{"id": "a", "approved": null}]}),
            )
            .await;
        store
            .insert_one(LEAVES_COLLECTION, json!({"username": "bilal", "leaves": []}))
            .await;
        store
    }

    #[tokio::test]
    async fn test_find_filters_documents() {
        let store = seeded().await;
        let found = store
            .find(LEAVES_COLLECTION, &Filter::eq("username", "asha"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["username"], "asha");
    }

    #[tokio::test]
    async fn test_find_on_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let found = store
            .find("employees", &Filter::And(vec![]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_update_one_without_match_reports_zero() {
        let store = seeded().await;
        let result = store
            .update_one(
                LEAVES_COLLECTION,
                &Filter::eq("username", "nobody"),
                &Update::PushEach {
                    field: "leaves".to_string(),
                    values: vec![json!({"id": "z"})],
                },
            )
            .await
            .unwrap();
        assert_eq!(result, MatchResult::default());
    }

    #[tokio::test]
    async fn test_update_one_reports_matched_and_modified() {
        let store = seeded().await;
        let result = store
            .update_one(
                LEAVES_COLLECTION,
                &Filter::eq("username", "bilal"),
                &Update::PushEach {
                    field: "leaves".to_string(),
                    values: vec![json!({"id": "z"})],
                },
            )
            .await
            .unwrap();
        assert_eq!(
            result,
            MatchResult {
                matched_count: 1,
                modified_count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_update_one_shape_error_is_storage_error() {
        let store = seeded().await;
        let result = store
            .update_one(
                LEAVES_COLLECTION,
                &Filter::eq("username", "asha"),
                &Update::PushEach {
                    field: "username".to_string(),
                    values: vec![json!(1)],
                },
            )
            .await;
        assert!(matches!(result, Err(EngineError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_stored_document() {
        let store = seeded().await;
        let filter = Filter::eq("username", "asha");
        let before = store.find(LEAVES_COLLECTION, &filter).await.unwrap();

        let result = store
            .update_one(
                LEAVES_COLLECTION,
                &filter,
                &Update::PushEach {
                    field: "profile.history".to_string(),
                    values: vec![json!({"id": "z"})],
                },
            )
            .await;
        assert!(matches!(result, Err(EngineError::Storage { .. })));

        let after = store.find(LEAVES_COLLECTION, &filter).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_aggregate_runs_stages_in_order() {
        let store = seeded().await;
        let pipeline = [
            Stage::Match(Filter::eq("username", "asha")),
            Stage::FilterArray {
                field: "leaves".to_string(),
                cond: Filter::eq("approved", true),
            },
        ];
        let out = store.aggregate(LEAVES_COLLECTION, &pipeline).await.unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0]["leaves"].as_array().unwrap().is_empty());

        // Aggregation never mutates stored documents
        let stored = store
            .find(LEAVES_COLLECTION, &Filter::eq("username", "asha"))
            .await
            .unwrap();
        assert_eq!(stored[0]["leaves"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_provisioning_skips_existing_documents() {
        let store = seeded().await;
        let created = store
            .provision_leave_documents(["asha", "chen"])
            .await
            .unwrap();
        assert_eq!(created, 1);

        let chen = store
            .find(LEAVES_COLLECTION, &Filter::eq("username", "chen"))
            .await
            .unwrap();
        assert_eq!(chen[0]["leaves"], json!([]));
    }
}
