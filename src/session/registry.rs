//! Session registry mapping opaque tokens to verified identities.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::Identity;

/// Opaque session token handed to the client after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Generates a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a token from its textual form (a UUID).
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
struct Session {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// Holds every open session.
///
/// Each request resolves its own token, so concurrent users never observe
/// each other's identity.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionToken, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Opens a session for an authenticated identity.
    pub async fn open(&self, identity: Identity) -> SessionToken {
        let token = SessionToken::generate();
        let expires_at = Utc::now() + self.ttl;
        debug!(username = %identity.username, %expires_at, "Opening session");

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > Utc::now());
        sessions.insert(
            token,
            Session {
                identity,
                expires_at,
            },
        );
        token
    }

    /// Returns the identity bound to `token`.
    ///
    /// Unknown and expired tokens fail with `Unauthenticated`.
    pub async fn resolve(&self, token: &SessionToken) -> EngineResult<Identity> {
        let sessions = self.sessions.read().await;
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.identity.clone()),
            _ => Err(EngineError::Unauthenticated),
        }
    }

    /// Closes a session. Returns false if it was not open.
    pub async fn close(&self, token: &SessionToken) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of sessions currently held, including expired ones not yet
    /// evicted.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no session is held.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
