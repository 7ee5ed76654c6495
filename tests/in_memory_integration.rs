//! End-to-end flows over the in-memory adapters, exercising the crate the
//! way a request handler composes it: reserve an index, apply the move,
//! reconcile follow-ups.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::DefaultClock;
use rolodex::followup::{
    adapters::memory::{InMemoryContactRepository, InMemoryTaskRepository},
    domain::{ContactId, ContactKind, FOLLOW_UP_TITLE, NewContact, Priority, Task},
    ports::{ContactRepository, TaskRepository},
    services::FollowupReconciler,
};
use rolodex::pipeline::{
    adapters::memory::InMemoryDealRepository,
    domain::{NewDeal, Probability, Stage},
    ports::DealRepository,
    services::{OrderIndexAllocator, StageTransitionEngine},
};
use rolodex::tenant::{TeamId, TenantContext, UserId};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[tokio::test(flavor = "multi_thread")]
async fn board_move_composes_allocator_and_engine() {
    let ctx = TenantContext::new(TeamId::new(), UserId::new());
    let deals = Arc::new(InMemoryDealRepository::new());
    let allocator = OrderIndexAllocator::new(Arc::clone(&deals));
    let engine = StageTransitionEngine::new(Arc::clone(&deals), Arc::new(DefaultClock));

    // Seed a lead column the way the create endpoint would: append-only.
    let mut created = Vec::new();
    for title in ["First", "Second", "Third"] {
        let index = allocator
            .next_index(&ctx, Stage::Lead)
            .await
            .expect("allocation should succeed");
        let deal = deals
            .create(
                &ctx,
                NewDeal::new(ctx.user(), ContactId::new(1), title, Stage::Lead, index)
                    .with_amount(1_000)
                    .with_probability(Probability::new(20).expect("valid probability")),
            )
            .await
            .expect("deal creation should succeed");
        created.push(deal);
    }

    // Drag the third deal to the top of the qualify column.
    let target = allocator
        .next_index(&ctx, Stage::Qualify)
        .await
        .expect("allocation should succeed");
    let moved = engine
        .move_to_stage(&ctx, created[2].id(), Stage::Qualify, Some(target))
        .await
        .expect("move should succeed");
    assert_eq!(moved.stage(), Stage::Qualify);
    assert_eq!(moved.order_index(), 10);

    // Drop another deal before it.
    let reserved = allocator
        .insert_before(&ctx, Stage::Qualify, 10)
        .await
        .expect("reservation should succeed");
    let second_move = engine
        .move_to_stage(&ctx, created[1].id(), Stage::Qualify, Some(reserved))
        .await
        .expect("move should succeed");
    assert_eq!(second_move.order_index(), 10);

    let qualify = deals
        .list_stage(&ctx, Stage::Qualify)
        .await
        .expect("bucket query should succeed");
    let order: Vec<_> = qualify.iter().map(|deal| deal.id()).collect();
    assert_eq!(order, vec![created[1].id(), created[2].id()]);

    // Win the board leader and archive it.
    let won = engine
        .move_to_stage(&ctx, created[1].id(), Stage::Won, None)
        .await
        .expect("move should succeed");
    assert_eq!(won.probability(), Probability::WON);
    let archived = engine
        .complete(&ctx, won.id())
        .await
        .expect("completion should succeed");
    assert!(archived.archived_at().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn follow_up_lifecycle_round_trips_through_the_contact() {
    let ctx = TenantContext::new(TeamId::new(), UserId::new());
    let contacts = Arc::new(InMemoryContactRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let reconciler = FollowupReconciler::new(
        Arc::clone(&contacts),
        Arc::clone(&tasks),
        Arc::new(DefaultClock),
    );

    let contact = contacts
        .create(
            &ctx,
            NewContact::new(ctx.user(), ContactKind::Company, "Acme Corp")
                .with_priority(Priority::High)
                .with_next_action_on(date(2026, 9, 1)),
        )
        .await
        .expect("contact creation should succeed");

    reconciler
        .on_next_action_changed(&ctx, contact.id())
        .await
        .expect("reconciliation should succeed");
    let pending = tasks
        .pending_follow_ups(&ctx, contact.id())
        .await
        .expect("pending query should succeed");
    assert_eq!(pending.len(), 1);
    let task = pending.into_iter().next().expect("one pending task");
    assert_eq!(task.title(), FOLLOW_UP_TITLE);
    assert_eq!(task.due_on(), date(2026, 9, 1));

    // Push the meeting out a week; the contact follows the task.
    let postponed = reconciler
        .postpone_task(&ctx, task.id(), 7)
        .await
        .expect("postponement should succeed");
    assert_eq!(postponed.due_on(), date(2026, 9, 8));

    // Complete it; the contact closes and no pending follow-up remains.
    reconciler
        .complete_task(&ctx, task.id())
        .await
        .expect("completion should succeed");
    let remaining = tasks
        .pending_follow_ups(&ctx, contact.id())
        .await
        .expect("pending query should succeed");
    assert!(remaining.is_empty());

    // A new date reopens the same task row instead of growing history.
    let mut refreshed = contacts
        .find(&ctx, contact.id())
        .await
        .expect("lookup should succeed")
        .expect("contact should exist");
    refreshed.set_next_action_on(Some(date(2026, 9, 15)), &DefaultClock);
    contacts
        .update(&ctx, &refreshed)
        .await
        .expect("contact update should succeed");
    reconciler
        .on_next_action_changed(&ctx, contact.id())
        .await
        .expect("reconciliation should succeed");

    let reopened = tasks
        .pending_follow_ups(&ctx, contact.id())
        .await
        .expect("pending query should succeed");
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.first().map(Task::id), Some(task.id()));
}
