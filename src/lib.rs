//! Leave Management Engine
//!
//! This crate turns leave applications into stored, business-day-only leave
//! records, moves those records through a one-shot approval state machine,
//! and decides who may see whose leave.
//!
//! The building blocks are:
//! - [`calendar`]: splitting date intervals around excluded days
//! - [`decomposition`]: holiday and weekend passes over an application
//! - [`approval`]: pending to approved or rejected, once per record
//! - [`visibility`]: self, team and approver scoped views
//! - [`session`]: per-login identities, replacing any global user
//! - [`store`]: collaborator contracts, an in-memory store and call timeouts
//! - [`api`]: the axum HTTP surface

#![warn(missing_docs)]

pub mod api;
pub mod approval;
pub mod calendar;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod visibility;
