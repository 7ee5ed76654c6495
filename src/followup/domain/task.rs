//! Task aggregate root.
//!
//! A follow-up task is not a distinct type: it is any task carrying the
//! reserved title and a contact link. That matches the persisted shape the
//! system has always used, so the discriminator stays a title match.

use super::{Contact, ContactId, Priority, TaskId};
use crate::pipeline::domain::DealId;
use crate::tenant::{TeamId, TenantScoped, UserId};
use chrono::{DateTime, Days, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Reserved title identifying auto-managed follow-up tasks.
pub const FOLLOW_UP_TITLE: &str = "Next follow-up";

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    team_id: TeamId,
    assignee_id: UserId,
    contact_id: Option<ContactId>,
    deal_id: Option<DealId>,
    title: String,
    priority: Priority,
    due_on: NaiveDate,
    done_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Draft data for creating a task; the repository assigns the identifier
/// and stamps the tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub(crate) assignee_id: UserId,
    pub(crate) contact_id: Option<ContactId>,
    pub(crate) deal_id: Option<DealId>,
    pub(crate) title: String,
    pub(crate) priority: Priority,
    pub(crate) due_on: NaiveDate,
}

impl NewTask {
    /// Creates a draft task with required fields.
    #[must_use]
    pub fn new(assignee_id: UserId, title: impl Into<String>, due_on: NaiveDate) -> Self {
        Self {
            assignee_id,
            contact_id: None,
            deal_id: None,
            title: title.into(),
            priority: Priority::Normal,
            due_on,
        }
    }

    /// Creates a draft follow-up task mirroring a contact's next-action date
    /// and priority. The assignee is the contact owner.
    #[must_use]
    pub fn follow_up(contact: &Contact, due_on: NaiveDate) -> Self {
        Self::new(contact.owner_id(), FOLLOW_UP_TITLE, due_on)
            .with_contact(contact.id())
            .with_priority(contact.priority())
    }

    /// Links the task to a contact.
    #[must_use]
    pub const fn with_contact(mut self, contact_id: ContactId) -> Self {
        self.contact_id = Some(contact_id);
        self
    }

    /// Links the task to a deal.
    #[must_use]
    pub const fn with_deal(mut self, deal_id: DealId) -> Self {
        self.deal_id = Some(deal_id);
        self
    }

    /// Sets the task priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning team.
    pub team_id: TeamId,
    /// Assigned user.
    pub assignee_id: UserId,
    /// Linked contact, if any.
    pub contact_id: Option<ContactId>,
    /// Linked deal, if any.
    pub deal_id: Option<DealId>,
    /// Task title.
    pub title: String,
    /// Task priority.
    pub priority: Priority,
    /// Due date.
    pub due_on: NaiveDate,
    /// Completion timestamp, if completed.
    pub done_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from draft data. Called by repositories once the
    /// identifier has been assigned.
    #[must_use]
    pub fn create(new: NewTask, id: TaskId, team_id: TeamId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            team_id,
            assignee_id: new.assignee_id,
            contact_id: new.contact_id,
            deal_id: new.deal_id,
            title: new.title,
            priority: new.priority,
            due_on: new.due_on,
            done_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            team_id: data.team_id,
            assignee_id: data.assignee_id,
            contact_id: data.contact_id,
            deal_id: data.deal_id,
            title: data.title,
            priority: data.priority,
            due_on: data.due_on,
            done_at: data.done_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn assignee_id(&self) -> UserId {
        self.assignee_id
    }

    /// Returns the linked contact, if any.
    #[must_use]
    pub const fn contact_id(&self) -> Option<ContactId> {
        self.contact_id
    }

    /// Returns the linked deal, if any.
    #[must_use]
    pub const fn deal_id(&self) -> Option<DealId> {
        self.deal_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_on(&self) -> NaiveDate {
        self.due_on
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn done_at(&self) -> Option<DateTime<Utc>> {
        self.done_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task has not been completed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.done_at.is_none()
    }

    /// Returns `true` when this is an auto-managed follow-up task: reserved
    /// title plus a contact link.
    #[must_use]
    pub fn is_follow_up(&self) -> bool {
        self.contact_id.is_some() && self.title == FOLLOW_UP_TITLE
    }

    /// Marks the task as completed at the current clock time.
    pub fn complete(&mut self, clock: &impl Clock) {
        self.done_at = Some(clock.utc());
        self.touch(clock);
    }

    /// Clears the completion timestamp, returning the task to pending.
    pub fn reopen(&mut self, clock: &impl Clock) {
        self.done_at = None;
        self.touch(clock);
    }

    /// Pushes the due date out by the given number of days.
    pub fn postpone(&mut self, days: u32, clock: &impl Clock) {
        self.due_on = self
            .due_on
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(self.due_on);
        self.touch(clock);
    }

    /// Stamps completion at an explicit time. Used by the bulk completion
    /// path in repositories, where no clock is available.
    pub(crate) const fn force_done_at(&mut self, at: DateTime<Utc>) {
        self.done_at = Some(at);
        self.updated_at = at;
    }

    /// Overwrites the due date and priority from a contact's current values.
    pub fn sync_with_contact(&mut self, due_on: NaiveDate, priority: Priority, clock: &impl Clock) {
        self.due_on = due_on;
        self.priority = priority;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl TenantScoped for Task {
    fn team_id(&self) -> TeamId {
        self.team_id
    }
}
