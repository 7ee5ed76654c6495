//! Gap-method order index allocation for board buckets.
//!
//! Deals in a bucket are sequenced with sparse integers spaced [`GAP`]
//! apart, so a drop between two neighbours usually needs no renumbering of
//! the rest of the column. Repeated drops between the same two neighbours
//! eventually exhaust the gap; no compaction pass exists for that case.

use crate::pipeline::{
    domain::Stage,
    ports::{DealRepository, PipelineRepositoryResult},
};
use crate::tenant::TenantContext;
use log::debug;
use std::sync::Arc;

/// Spacing between consecutive order indices in a bucket.
pub const GAP: i32 = 10;

/// Assigns and renumbers order indices within (team, stage) buckets.
#[derive(Clone)]
pub struct OrderIndexAllocator<R>
where
    R: DealRepository,
{
    deals: Arc<R>,
}

impl<R> OrderIndexAllocator<R>
where
    R: DealRepository,
{
    /// Creates a new allocator over the given repository.
    #[must_use]
    pub const fn new(deals: Arc<R>) -> Self {
        Self { deals }
    }

    /// Reserves an index at the end of the bucket: the current maximum plus
    /// [`GAP`], or [`GAP`] for an empty bucket.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the bucket query fails.
    pub async fn next_index(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<i32> {
        let max = self.deals.max_order_index(ctx, stage).await?;
        Ok(max.map_or(GAP, |index| index + GAP))
    }

    /// Reserves `target_index` inside the bucket: every deal at or after
    /// that position is first shifted by [`GAP`] in one batch, so the
    /// returned index is free and relative order is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineRepositoryError::OrderingConflict`] when a
    /// concurrent insertion into the same bucket is detected.
    ///
    /// [`PipelineRepositoryError::OrderingConflict`]: crate::pipeline::ports::PipelineRepositoryError::OrderingConflict
    pub async fn insert_before(
        &self,
        ctx: &TenantContext,
        stage: Stage,
        target_index: i32,
    ) -> PipelineRepositoryResult<i32> {
        let moved = self
            .deals
            .shift_bucket_from(ctx, stage, target_index, GAP)
            .await?;
        debug!("reserved index {target_index} in {stage} bucket, shifted {moved} deals");
        Ok(target_index)
    }
}
