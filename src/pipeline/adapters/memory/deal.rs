//! In-memory deal repository for pipeline tests.
//!
//! The write lock serialises bucket operations, so the shift batch is
//! naturally atomic here; only the Postgres adapter has to work for it.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::pipeline::{
    domain::{Deal, DealId, NewDeal, Stage},
    ports::{DealRepository, PipelineRepositoryError, PipelineRepositoryResult},
};
use crate::tenant::{self, TenantContext, TenantScoped};

/// Thread-safe in-memory deal repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDealRepository {
    state: Arc<RwLock<InMemoryDealState>>,
}

#[derive(Debug, Default)]
struct InMemoryDealState {
    deals: HashMap<DealId, Deal>,
    next_id: i64,
}

impl InMemoryDealRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> PipelineRepositoryError {
    PipelineRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn in_bucket(deal: &Deal, ctx: &TenantContext, stage: Stage) -> bool {
    deal.team_id() == ctx.team() && deal.stage() == stage
}

#[async_trait]
impl DealRepository for InMemoryDealRepository {
    async fn create(&self, ctx: &TenantContext, new: NewDeal) -> PipelineRepositoryResult<Deal> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.next_id += 1;
        let id = DealId::new(state.next_id);
        let deal = Deal::create(new, id, ctx.team(), Utc::now());
        state.deals.insert(id, deal.clone());
        Ok(deal)
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        id: DealId,
    ) -> PipelineRepositoryResult<Option<Deal>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .deals
            .get(&id)
            .filter(|deal| deal.team_id() == ctx.team())
            .cloned())
    }

    async fn update(&self, ctx: &TenantContext, deal: &Deal) -> PipelineRepositoryResult<()> {
        tenant::ensure_scope(ctx, deal)?;
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.deals.contains_key(&deal.id()) {
            return Err(PipelineRepositoryError::NotFound(deal.id()));
        }
        state.deals.insert(deal.id(), deal.clone());
        Ok(())
    }

    async fn max_order_index(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<Option<i32>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .deals
            .values()
            .filter(|deal| in_bucket(deal, ctx, stage))
            .map(Deal::order_index)
            .max())
    }

    async fn shift_bucket_from(
        &self,
        ctx: &TenantContext,
        stage: Stage,
        from_index: i32,
        by: i32,
    ) -> PipelineRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_error)?;
        let mut moved = 0;
        for deal in state.deals.values_mut() {
            if in_bucket(deal, ctx, stage) && deal.order_index() >= from_index {
                deal.shift_order_index(by);
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn list_stage(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<Vec<Deal>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut deals: Vec<Deal> = state
            .deals
            .values()
            .filter(|deal| in_bucket(deal, ctx, stage) && !deal.is_archived())
            .cloned()
            .collect();
        deals.sort_by_key(Deal::order_index);
        Ok(deals)
    }
}
