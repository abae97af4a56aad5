//! Authentication contract.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::Identity;
use crate::store::Directory;

/// Login request as received from the client.
///
/// Credential material is verified upstream; only the verified username
/// reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// The verified username.
    pub username: String,
}

/// Turns credentials into a verified identity.
pub trait Authenticator: Send + Sync {
    /// Verifies `credentials`, failing with `Unauthenticated` if they do not
    /// identify a known employee.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = EngineResult<Identity>> + Send;
}

/// Resolves the organisational identity of an upstream-verified user from
/// the employee directory.
#[derive(Debug, Clone)]
pub struct DirectoryAuthenticator<D> {
    directory: D,
}

impl<D: Directory> DirectoryAuthenticator<D> {
    /// Creates an authenticator backed by `directory`.
    pub fn new(directory: D) -> Self {
        Self { directory }
    }
}

impl<D: Directory> Authenticator for DirectoryAuthenticator<D> {
    async fn authenticate(&self, credentials: &Credentials) -> EngineResult<Identity> {
        let username = credentials.username.trim();
        if username.is_empty() {
            return Err(EngineError::Unauthenticated);
        }

        match self.directory.find_user(username).await? {
            Some(identity) => Ok(identity),
            None => {
                warn!(username, "Login for unknown user");
                Err(EngineError::Unauthenticated)
            }
        }
    }
}
