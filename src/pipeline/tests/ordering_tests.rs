//! Service tests for gap-method order index allocation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::followup::domain::ContactId;
use crate::pipeline::{
    adapters::memory::InMemoryDealRepository,
    domain::{Deal, DealId, NewDeal, Stage},
    ports::DealRepository,
    services::{GAP, OrderIndexAllocator},
};
use crate::tenant::{TeamId, TenantContext, UserId};
use rstest::{fixture, rstest};

struct Harness {
    ctx: TenantContext,
    deals: Arc<InMemoryDealRepository>,
    allocator: OrderIndexAllocator<InMemoryDealRepository>,
}

#[fixture]
fn harness() -> Harness {
    let deals = Arc::new(InMemoryDealRepository::new());
    let allocator = OrderIndexAllocator::new(Arc::clone(&deals));
    Harness {
        ctx: TenantContext::new(TeamId::new(), UserId::new()),
        deals,
        allocator,
    }
}

async fn create_deal(harness: &Harness, stage: Stage, order_index: i32) -> Deal {
    let new = NewDeal::new(
        harness.ctx.user(),
        ContactId::new(1),
        "Renewal",
        stage,
        order_index,
    );
    harness
        .deals
        .create(&harness.ctx, new)
        .await
        .expect("deal creation should succeed")
}

async fn bucket_indices(harness: &Harness, stage: Stage) -> Vec<(DealId, i32)> {
    harness
        .deals
        .list_stage(&harness.ctx, stage)
        .await
        .expect("bucket query should succeed")
        .iter()
        .map(|deal| (deal.id(), deal.order_index()))
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_bucket_starts_at_the_gap(harness: Harness) {
    let index = harness
        .allocator
        .next_index(&harness.ctx, Stage::Lead)
        .await
        .expect("allocation should succeed");
    assert_eq!(index, GAP);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn append_allocations_step_by_the_gap(harness: Harness) {
    let first = harness
        .allocator
        .next_index(&harness.ctx, Stage::Lead)
        .await
        .expect("allocation should succeed");
    assert_eq!(first, 10);
    create_deal(&harness, Stage::Lead, first).await;

    let second = harness
        .allocator
        .next_index(&harness.ctx, Stage::Lead)
        .await
        .expect("allocation should succeed");
    assert_eq!(second, 20);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn buckets_are_independent_per_stage(harness: Harness) {
    create_deal(&harness, Stage::Lead, 30).await;

    let index = harness
        .allocator
        .next_index(&harness.ctx, Stage::Qualify)
        .await
        .expect("allocation should succeed");
    assert_eq!(index, GAP);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn buckets_are_independent_per_team(harness: Harness) {
    create_deal(&harness, Stage::Lead, 30).await;
    let other_team = TenantContext::new(TeamId::new(), UserId::new());

    let index = harness
        .allocator
        .next_index(&other_team, Stage::Lead)
        .await
        .expect("allocation should succeed");
    assert_eq!(index, GAP);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_before_shifts_the_tail_and_frees_the_target(harness: Harness) {
    let a = create_deal(&harness, Stage::Lead, 10).await;
    let b = create_deal(&harness, Stage::Lead, 20).await;
    let c = create_deal(&harness, Stage::Lead, 30).await;

    let reserved = harness
        .allocator
        .insert_before(&harness.ctx, Stage::Lead, 20)
        .await
        .expect("reservation should succeed");
    assert_eq!(reserved, 20);
    let moved = create_deal(&harness, Stage::Lead, reserved).await;

    let indices = bucket_indices(&harness, Stage::Lead).await;
    assert_eq!(
        indices,
        vec![
            (a.id(), 10),
            (moved.id(), 20),
            (b.id(), 30),
            (c.id(), 40),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mixed_allocation_sequence_never_collides(harness: Harness) {
    for _ in 0..4 {
        let index = harness
            .allocator
            .next_index(&harness.ctx, Stage::Lead)
            .await
            .expect("allocation should succeed");
        create_deal(&harness, Stage::Lead, index).await;
    }
    for target in [10, 20, 10] {
        let reserved = harness
            .allocator
            .insert_before(&harness.ctx, Stage::Lead, target)
            .await
            .expect("reservation should succeed");
        create_deal(&harness, Stage::Lead, reserved).await;
    }

    let indices = bucket_indices(&harness, Stage::Lead).await;
    let distinct: HashSet<i32> = indices.iter().map(|(_, index)| *index).collect();
    assert_eq!(distinct.len(), indices.len(), "indices must stay unique");
    let mut sorted = indices.clone();
    sorted.sort_by_key(|(_, index)| *index);
    assert_eq!(indices, sorted, "bucket listing is ordered by index");
}
