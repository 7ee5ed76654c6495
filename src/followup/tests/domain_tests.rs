//! Domain-focused tests for contacts, tasks, and the follow-up predicate.

use crate::followup::domain::{
    Contact, ContactKind, ContactStatus, FOLLOW_UP_TITLE, NewContact, NewTask, ParsePriorityError,
    Priority, Task, TaskId,
};
use crate::followup::domain::ContactId;
use crate::tenant::{TeamId, UserId};
use chrono::{NaiveDate, Utc};
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn contact() -> Contact {
    let new = NewContact::new(UserId::new(), ContactKind::Person, "Ada Lovelace")
        .with_priority(Priority::High)
        .with_next_action_on(date(2026, 9, 1));
    Contact::create(new, ContactId::new(1), TeamId::new(), Utc::now())
}

#[rstest]
#[case("low", Priority::Low)]
#[case("normal", Priority::Normal)]
#[case("high", Priority::High)]
#[case(" High ", Priority::High)]
fn priority_parses_valid_values(#[case] input: &str, #[case] expected: Priority) {
    assert_eq!(Priority::try_from(input), Ok(expected));
}

#[rstest]
fn priority_rejects_unknown_values() {
    assert_eq!(
        Priority::try_from("urgent"),
        Err(ParsePriorityError("urgent".to_owned()))
    );
}

#[rstest]
#[case("urgent")]
#[case("")]
#[case("critical")]
fn priority_parse_lossy_falls_back_to_normal(#[case] input: &str) {
    assert_eq!(Priority::parse_lossy(input), Priority::Normal);
}

#[rstest]
fn contact_create_starts_pending(contact: Contact) {
    assert_eq!(contact.status(), ContactStatus::Pending);
    assert_eq!(contact.next_action_on(), Some(date(2026, 9, 1)));
    assert!(contact.archived_at().is_none());
}

#[rstest]
fn follow_up_draft_mirrors_contact(contact: Contact) {
    let new = NewTask::follow_up(&contact, date(2026, 9, 1));
    let task = Task::create(new, TaskId::new(7), TeamId::new(), Utc::now());

    assert_eq!(task.title(), FOLLOW_UP_TITLE);
    assert_eq!(task.assignee_id(), contact.owner_id());
    assert_eq!(task.contact_id(), Some(contact.id()));
    assert_eq!(task.priority(), Priority::High);
    assert_eq!(task.due_on(), date(2026, 9, 1));
    assert!(task.is_pending());
    assert!(task.is_follow_up());
}

#[rstest]
fn follow_up_predicate_requires_reserved_title_and_contact(clock: DefaultClock) {
    let assignee = UserId::new();
    let plain = Task::create(
        NewTask::new(assignee, "Call back", date(2026, 9, 1)).with_contact(ContactId::new(3)),
        TaskId::new(1),
        TeamId::new(),
        clock.utc(),
    );
    let unlinked = Task::create(
        NewTask::new(assignee, FOLLOW_UP_TITLE, date(2026, 9, 1)),
        TaskId::new(2),
        TeamId::new(),
        clock.utc(),
    );

    assert!(!plain.is_follow_up());
    assert!(!unlinked.is_follow_up());
}

#[rstest]
fn postpone_pushes_due_date_forward(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = Task::create(
        NewTask::new(UserId::new(), "Send quote", date(2026, 8, 28)),
        TaskId::new(1),
        TeamId::new(),
        clock.utc(),
    );
    let original_updated_at = task.updated_at();

    task.postpone(3, &clock);

    ensure!(task.due_on() == date(2026, 8, 31));
    ensure!(task.updated_at() >= original_updated_at);
    Ok(())
}

#[rstest]
fn complete_and_reopen_toggle_pending(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = Task::create(
        NewTask::new(UserId::new(), "Send quote", date(2026, 8, 28)),
        TaskId::new(1),
        TeamId::new(),
        clock.utc(),
    );

    task.complete(&clock);
    ensure!(!task.is_pending());
    ensure!(task.done_at().is_some());

    task.reopen(&clock);
    ensure!(task.is_pending());
    ensure!(task.done_at().is_none());
    Ok(())
}
