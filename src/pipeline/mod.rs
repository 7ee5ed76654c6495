//! Deal pipeline management.
//!
//! This module implements the kanban-style deal board: gap-method ordering
//! of deals within each (team, stage) bucket, the stage transition rules
//! with their probability side effects, and soft archival of completed
//! deals. The module follows hexagonal architecture:
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
