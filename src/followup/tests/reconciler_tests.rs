//! Service tests for follow-up reconciliation.

use std::sync::Arc;

use crate::followup::{
    adapters::memory::{InMemoryContactRepository, InMemoryTaskRepository},
    domain::{
        Contact, ContactKind, ContactStatus, FOLLOW_UP_TITLE, NewContact, NewTask, Priority, Task,
    },
    ports::{ContactRepository, FollowupRepositoryError, TaskRepository},
    services::{FollowupReconciler, FollowupServiceError},
};
use crate::tenant::{TeamId, TenantContext, UserId};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestReconciler =
    FollowupReconciler<InMemoryContactRepository, InMemoryTaskRepository, DefaultClock>;

struct Harness {
    ctx: TenantContext,
    contacts: Arc<InMemoryContactRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    reconciler: TestReconciler,
    clock: DefaultClock,
}

#[fixture]
fn harness() -> Harness {
    let contacts = Arc::new(InMemoryContactRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let reconciler = FollowupReconciler::new(
        Arc::clone(&contacts),
        Arc::clone(&tasks),
        Arc::new(DefaultClock),
    );
    Harness {
        ctx: TenantContext::new(TeamId::new(), UserId::new()),
        contacts,
        tasks,
        reconciler,
        clock: DefaultClock,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

async fn create_contact(harness: &Harness, next_action_on: Option<NaiveDate>) -> Contact {
    let mut new = NewContact::new(harness.ctx.user(), ContactKind::Person, "Grace Hopper")
        .with_priority(Priority::High);
    if let Some(day) = next_action_on {
        new = new.with_next_action_on(day);
    }
    harness
        .contacts
        .create(&harness.ctx, new)
        .await
        .expect("contact creation should succeed")
}

async fn create_follow_up(harness: &Harness, contact: &Contact, due_on: NaiveDate) -> Task {
    harness
        .tasks
        .create(&harness.ctx, NewTask::follow_up(contact, due_on))
        .await
        .expect("task creation should succeed")
}

async fn pending_follow_ups(harness: &Harness, contact: &Contact) -> Vec<Task> {
    harness
        .tasks
        .pending_follow_ups(&harness.ctx, contact.id())
        .await
        .expect("pending query should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_next_action_date_is_a_no_op(harness: Harness) {
    let contact = create_contact(&harness, None).await;

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("reconciliation should succeed");

    assert!(pending_follow_ups(&harness, &contact).await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creates_single_task_mirroring_contact(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("reconciliation should succeed");

    let pending = pending_follow_ups(&harness, &contact).await;
    let [task] = pending.as_slice() else {
        panic!("expected exactly one pending follow-up, got {}", pending.len());
    };
    assert_eq!(task.title(), FOLLOW_UP_TITLE);
    assert_eq!(task.due_on(), date(2026, 8, 27));
    assert_eq!(task.priority(), Priority::High);
    assert_eq!(task.assignee_id(), contact.owner_id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_reconciliation_is_idempotent(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("first reconciliation should succeed");
    let first = pending_follow_ups(&harness, &contact).await;

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("second reconciliation should succeed");
    let second = pending_follow_ups(&harness, &contact).await;

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(
        first.first().map(Task::id),
        second.first().map(Task::id),
        "the same task row should survive"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn existing_pending_task_is_resynchronized(harness: Harness) {
    let mut contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    let stale = create_follow_up(&harness, &contact, date(2026, 8, 27)).await;

    contact.set_next_action_on(Some(date(2026, 9, 3)), &harness.clock);
    contact.set_priority(Priority::Low, &harness.clock);
    harness
        .contacts
        .update(&harness.ctx, &contact)
        .await
        .expect("contact update should succeed");

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("reconciliation should succeed");

    let pending = pending_follow_ups(&harness, &contact).await;
    let [task] = pending.as_slice() else {
        panic!("expected exactly one pending follow-up");
    };
    assert_eq!(task.id(), stale.id());
    assert_eq!(task.due_on(), date(2026, 9, 3));
    assert_eq!(task.priority(), Priority::Low);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drift_repair_keeps_only_the_newest_task(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    let older = create_follow_up(&harness, &contact, date(2026, 8, 25)).await;
    let newer = create_follow_up(&harness, &contact, date(2026, 8, 27)).await;
    assert!(newer.id() > older.id());

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("reconciliation should succeed");

    let pending = pending_follow_ups(&harness, &contact).await;
    let [survivor] = pending.as_slice() else {
        panic!("expected exactly one pending follow-up after repair");
    };
    assert_eq!(survivor.id(), newer.id());
    assert!(
        harness
            .tasks
            .find(&harness.ctx, older.id())
            .await
            .expect("lookup should succeed")
            .is_none(),
        "stale duplicate should be deleted"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_task_is_reopened_instead_of_duplicated(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    let done = harness
        .reconciler
        .complete_task(
            &harness.ctx,
            create_follow_up(&harness, &contact, date(2026, 8, 20)).await.id(),
        )
        .await
        .expect("completion should succeed");

    harness
        .reconciler
        .on_next_action_changed(&harness.ctx, contact.id())
        .await
        .expect("reconciliation should succeed");

    let pending = pending_follow_ups(&harness, &contact).await;
    let [task] = pending.as_slice() else {
        panic!("expected exactly one pending follow-up");
    };
    assert_eq!(task.id(), done.id(), "history should stay on one row");
    assert!(task.done_at().is_none());
    assert_eq!(task.due_on(), date(2026, 8, 27));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_task_closes_contact_and_all_pending_follow_ups(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    // Seed drift so the bulk path has more than one row to close.
    let first = create_follow_up(&harness, &contact, date(2026, 8, 25)).await;
    let _second = create_follow_up(&harness, &contact, date(2026, 8, 27)).await;

    let completed = harness
        .reconciler
        .complete_task(&harness.ctx, first.id())
        .await
        .expect("completion should succeed");

    assert!(completed.done_at().is_some());
    let refreshed = harness
        .contacts
        .find(&harness.ctx, contact.id())
        .await
        .expect("lookup should succeed")
        .expect("contact should exist");
    assert_eq!(refreshed.status(), ContactStatus::Completed);
    assert!(pending_follow_ups(&harness, &contact).await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_task_without_contact_only_stamps_the_task(harness: Harness) {
    let task = harness
        .tasks
        .create(
            &harness.ctx,
            NewTask::new(harness.ctx.user(), "Prepare demo", date(2026, 8, 27)),
        )
        .await
        .expect("task creation should succeed");

    let completed = harness
        .reconciler
        .complete_task(&harness.ctx, task.id())
        .await
        .expect("completion should succeed");

    assert!(completed.done_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postpone_task_reopens_contact_and_tracks_due_date(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    let task = create_follow_up(&harness, &contact, date(2026, 8, 27)).await;

    let postponed = harness
        .reconciler
        .postpone_task(&harness.ctx, task.id(), 2)
        .await
        .expect("postponement should succeed");

    assert_eq!(postponed.due_on(), date(2026, 8, 29));
    let refreshed = harness
        .contacts
        .find(&harness.ctx, contact.id())
        .await
        .expect("lookup should succeed")
        .expect("contact should exist");
    assert_eq!(refreshed.status(), ContactStatus::Pending);
    assert_eq!(refreshed.next_action_on(), Some(date(2026, 8, 29)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_tenant_sees_contact_as_missing(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    let foreign_ctx = TenantContext::new(TeamId::new(), UserId::new());

    let result = harness
        .reconciler
        .on_next_action_changed(&foreign_ctx, contact.id())
        .await;

    assert!(matches!(
        result,
        Err(FollowupServiceError::Repository(
            FollowupRepositoryError::ContactNotFound(_)
        ))
    ));
    assert!(
        pending_follow_ups(&harness, &contact).await.is_empty(),
        "no task should be created across tenants"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_tenant_write_is_rejected(harness: Harness) {
    let contact = create_contact(&harness, Some(date(2026, 8, 27))).await;
    let foreign_ctx = TenantContext::new(TeamId::new(), UserId::new());

    let result = harness.contacts.update(&foreign_ctx, &contact).await;

    assert!(matches!(
        result,
        Err(FollowupRepositoryError::Tenant(_))
    ));
}
