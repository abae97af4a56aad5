//! Storage and collaborator plumbing.
//!
//! This module defines the contracts the engine needs from its external
//! collaborators (document store, employee directory, holiday source), the
//! structured query model passed to the store, an in-memory store, and a
//! wrapper imposing timeouts on every collaborator call.

mod bounded;
mod contracts;
mod memory;
mod query;

pub use bounded::{Bounded, within};
pub use contracts::{Directory, DocumentStore, HolidaySource, LEAVES_COLLECTION};
pub use memory::MemoryStore;
pub use query::{Filter, MatchResult, Stage, Update};
