//! Contact follow-up management.
//!
//! This module owns the invariant that a contact has at most one pending
//! follow-up task, and keeps that task synchronized with the contact's
//! next-action date and priority in both directions: contact edits flow to
//! the task, and task completion or postponement flows back to the contact.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
