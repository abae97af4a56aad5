//! Sessions and authentication.
//!
//! Identities are bound to per-login session tokens and resolved on every
//! request; nothing in the engine keeps a "current user".

mod authenticator;
mod registry;

pub use authenticator::{Authenticator, Credentials, DirectoryAuthenticator};
pub use registry::{SessionRegistry, SessionToken};
