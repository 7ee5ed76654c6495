//! Port contracts for follow-up management.
//!
//! Ports define infrastructure-agnostic interfaces used by follow-up
//! services. Every method takes the caller's tenant context; rows outside
//! the caller's team behave as absent.

pub mod repository;

pub use repository::{
    ContactRepository, FollowupRepositoryError, FollowupRepositoryResult, TaskRepository,
};
