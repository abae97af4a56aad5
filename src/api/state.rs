//! Application state for the leave API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::decomposition::LeavePolicy;
use crate::error::EngineResult;
use crate::session::{DirectoryAuthenticator, SessionRegistry};
use crate::store::{Bounded, MemoryStore};

/// Shared application state.
///
/// Every collaborator is wrapped in [`Bounded`] so no request waits on an
/// external call longer than the configured limit.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    reference: Bounded<ConfigLoader>,
    store: Bounded<MemoryStore>,
    authenticator: DirectoryAuthenticator<Bounded<ConfigLoader>>,
    sessions: SessionRegistry,
    policy: LeavePolicy,
}

impl AppState {
    /// Creates the application state and provisions an empty leave document
    /// for every employee in the directory.
    pub async fn new(config: ConfigLoader) -> EngineResult<Self> {
        let limit = config.external_call_timeout();
        let store = MemoryStore::new();
        store
            .provision_leave_documents(config.usernames().map(str::to_string))
            .await?;

        let reference = Bounded::new(config, limit);
        let inner = Inner {
            authenticator: DirectoryAuthenticator::new(reference.clone()),
            sessions: SessionRegistry::new(reference.get_ref().session_ttl()),
            policy: LeavePolicy::from(reference.get_ref().service()),
            store: Bounded::new(store, limit),
            reference,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        self.inner.reference.get_ref()
    }

    /// The employee directory, bounded by the call timeout.
    pub fn directory(&self) -> &Bounded<ConfigLoader> {
        &self.inner.reference
    }

    /// The holiday source, bounded by the call timeout.
    pub fn holidays(&self) -> &Bounded<ConfigLoader> {
        &self.inner.reference
    }

    /// The leave document store, bounded by the call timeout.
    pub fn store(&self) -> &Bounded<MemoryStore> {
        &self.inner.store
    }

    /// Resolves login credentials to identities.
    pub fn authenticator(&self) -> &DirectoryAuthenticator<Bounded<ConfigLoader>> {
        &self.inner.authenticator
    }

    /// Open sessions.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    /// Calendar rules for decomposition.
    pub fn policy(&self) -> &LeavePolicy {
        &self.inner.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveDocument;
    use crate::store::{DocumentStore, Filter, LEAVES_COLLECTION};

    #[test]
    fn test_app_state_is_clone() {
        // Required for axum state
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_new_state_provisions_every_employee() {
        let config = ConfigLoader::load("./config/leave").unwrap();
        let state = AppState::new(config).await.unwrap();

        let documents = state
            .store()
            .find(LEAVES_COLLECTION, &Filter::is_in("username", ["asha", "meera"]))
            .await
            .unwrap();
        assert_eq!(documents.len(), 2);

        let document: LeaveDocument = serde_json::from_value(documents[0].clone()).unwrap();
        assert!(document.leaves.is_empty());
        assert_eq!(state.policy().country, "IN");
        assert!(state.sessions().is_empty().await);
    }
}
