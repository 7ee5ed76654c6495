//! Repository port for deal persistence and bucket ordering queries.

use crate::pipeline::domain::{Deal, DealId, NewDeal, Stage};
use crate::tenant::{CrossTenantViolation, TeamId, TenantContext};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for pipeline repository operations.
pub type PipelineRepositoryResult<T> = Result<T, PipelineRepositoryError>;

/// Deal persistence contract. The bucket operations (`max_order_index`,
/// `shift_bucket_from`) back the gap-method allocator and must execute as
/// single consistent units per (team, stage) bucket: a partially applied
/// shift corrupts ordering.
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Stores a new deal, assigning its identifier and stamping the
    /// caller's team.
    async fn create(&self, ctx: &TenantContext, new: NewDeal) -> PipelineRepositoryResult<Deal>;

    /// Finds a deal by identifier within the caller's team.
    ///
    /// Returns `None` when the deal does not exist in this team.
    async fn find(&self, ctx: &TenantContext, id: DealId)
    -> PipelineRepositoryResult<Option<Deal>>;

    /// Persists changes to an existing deal.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineRepositoryError::Tenant`] on a team-stamp mismatch
    /// and [`PipelineRepositoryError::NotFound`] when the row is absent.
    async fn update(&self, ctx: &TenantContext, deal: &Deal) -> PipelineRepositoryResult<()>;

    /// Returns the highest order index in the (team, stage) bucket, or
    /// `None` when the bucket is empty. Archived deals still occupy their
    /// index and are included.
    async fn max_order_index(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<Option<i32>>;

    /// Shifts every deal in the bucket whose order index is at or above
    /// `from_index` by `by`, as one atomic batch. Returns the number of
    /// rows moved.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineRepositoryError::OrderingConflict`] when a
    /// concurrent write on the same bucket is detected; the caller may
    /// retry the whole move.
    async fn shift_bucket_from(
        &self,
        ctx: &TenantContext,
        stage: Stage,
        from_index: i32,
        by: i32,
    ) -> PipelineRepositoryResult<usize>;

    /// Returns the active (non-archived) deals of a bucket ordered by
    /// ascending order index.
    async fn list_stage(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<Vec<Deal>>;
}

/// Errors returned by deal repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PipelineRepositoryError {
    /// The deal was not found in the caller's team.
    #[error("deal not found: {0}")]
    NotFound(DealId),

    /// A concurrent write was detected on a (team, stage) bucket. The
    /// operation left no partial state and may be retried by the caller.
    #[error("ordering conflict in bucket ({team}, {stage})")]
    OrderingConflict {
        /// Team owning the contested bucket.
        team: TeamId,
        /// Stage of the contested bucket.
        stage: Stage,
    },

    /// A write addressed an entity stamped with another team.
    #[error(transparent)]
    Tenant(#[from] CrossTenantViolation),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PipelineRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
