//! Stage transition engine for deals.

use crate::pipeline::{
    domain::{Deal, DealId, Stage},
    ports::{DealRepository, PipelineRepositoryError, PipelineRepositoryResult},
};
use crate::tenant::{CrossTenantViolation, TenantContext};
use log::info;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineServiceError {
    /// The operation addressed an entity outside the caller's team.
    #[error(transparent)]
    Tenant(#[from] CrossTenantViolation),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PipelineRepositoryError),
}

/// Result type for pipeline service operations.
pub type PipelineServiceResult<T> = Result<T, PipelineServiceError>;

/// Applies stage changes and completion to deals.
///
/// The engine never allocates order indices itself; a caller that wants an
/// explicit board position reserves it through
/// [`OrderIndexAllocator`](crate::pipeline::services::OrderIndexAllocator)
/// first and passes the reserved index in.
#[derive(Clone)]
pub struct StageTransitionEngine<R, C>
where
    R: DealRepository,
    C: Clock + Send + Sync,
{
    deals: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> StageTransitionEngine<R, C>
where
    R: DealRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new engine over the given repository.
    #[must_use]
    pub const fn new(deals: Arc<R>, clock: Arc<C>) -> Self {
        Self { deals, clock }
    }

    /// Moves a deal to `new_stage`, forcing probability to 100 on `Won` and
    /// 0 on `Lost`. When `new_index` is given, the deal takes that board
    /// position; the caller is responsible for having reserved it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineServiceError::Repository`] when the deal is
    /// missing from the caller's team or persistence fails.
    pub async fn move_to_stage(
        &self,
        ctx: &TenantContext,
        deal_id: DealId,
        new_stage: Stage,
        new_index: Option<i32>,
    ) -> PipelineServiceResult<Deal> {
        let mut deal = self.load(ctx, deal_id).await?;
        let from = deal.stage();
        deal.move_to_stage(new_stage, new_index, &*self.clock);
        self.deals.update(ctx, &deal).await?;
        info!("deal {deal_id} moved {from} -> {new_stage}");
        Ok(deal)
    }

    /// Completes a deal: stamps `archived_at`, hiding it from the active
    /// board without touching stage or probability. Allowed from any stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineServiceError::Repository`] when the deal is
    /// missing from the caller's team or persistence fails.
    pub async fn complete(
        &self,
        ctx: &TenantContext,
        deal_id: DealId,
    ) -> PipelineServiceResult<Deal> {
        let mut deal = self.load(ctx, deal_id).await?;
        deal.complete(&*self.clock);
        self.deals.update(ctx, &deal).await?;
        Ok(deal)
    }

    async fn load(&self, ctx: &TenantContext, id: DealId) -> PipelineServiceResult<Deal> {
        let found: PipelineRepositoryResult<Option<Deal>> = self.deals.find(ctx, id).await;
        Ok(found?.ok_or(PipelineRepositoryError::NotFound(id))?)
    }
}
