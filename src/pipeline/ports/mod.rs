//! Port contracts for the deal pipeline.
//!
//! Ports define infrastructure-agnostic interfaces used by pipeline
//! services. Every method takes the caller's tenant context; rows outside
//! the caller's team behave as absent.

pub mod repository;

pub use repository::{DealRepository, PipelineRepositoryError, PipelineRepositoryResult};
