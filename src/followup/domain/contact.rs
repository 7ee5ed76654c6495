//! Contact aggregate root.

use super::{ContactId, ParseContactKindError, ParseContactStatusError, Priority};
use crate::tenant::{TeamId, TenantScoped, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Whether a contact represents an individual or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    /// An individual person.
    Person,
    /// A company or organization.
    Company,
}

impl ContactKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Company => "company",
        }
    }
}

impl TryFrom<&str> for ContactKind {
    type Error = ParseContactKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "company" => Ok(Self::Company),
            _ => Err(ParseContactKindError(value.to_owned())),
        }
    }
}

/// Follow-up state of a contact, driven exclusively by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// A follow-up is outstanding (or no follow-up has happened yet).
    Pending,
    /// The latest follow-up task was completed.
    Completed,
}

impl ContactStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for ContactStatus {
    type Error = ParseContactStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseContactStatusError(value.to_owned())),
        }
    }
}

/// Contact aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    id: ContactId,
    team_id: TeamId,
    owner_id: UserId,
    kind: ContactKind,
    name: String,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    tags: Vec<String>,
    priority: Priority,
    status: ContactStatus,
    note: Option<String>,
    next_action_on: Option<NaiveDate>,
    last_contacted_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Draft data for creating a contact; the repository assigns the identifier
/// and stamps the tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub(crate) owner_id: UserId,
    pub(crate) kind: ContactKind,
    pub(crate) name: String,
    pub(crate) company: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) priority: Priority,
    pub(crate) note: Option<String>,
    pub(crate) next_action_on: Option<NaiveDate>,
}

impl NewContact {
    /// Creates a draft contact with required fields.
    #[must_use]
    pub fn new(owner_id: UserId, kind: ContactKind, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            kind,
            name: name.into(),
            company: None,
            email: None,
            phone: None,
            tags: Vec::new(),
            priority: Priority::Normal,
            note: None,
            next_action_on: None,
        }
    }

    /// Sets the company name.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets free-form tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the contact priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the free-text note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the initial next-action date.
    #[must_use]
    pub const fn with_next_action_on(mut self, date: NaiveDate) -> Self {
        self.next_action_on = Some(date);
        self
    }
}

/// Parameter object for reconstructing a persisted contact aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedContactData {
    /// Persisted contact identifier.
    pub id: ContactId,
    /// Owning team.
    pub team_id: TeamId,
    /// Owning user.
    pub owner_id: UserId,
    /// Person or company.
    pub kind: ContactKind,
    /// Display name.
    pub name: String,
    /// Company name, if any.
    pub company: Option<String>,
    /// Email address, if any.
    pub email: Option<String>,
    /// Phone number, if any.
    pub phone: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Contact priority.
    pub priority: Priority,
    /// Follow-up status.
    pub status: ContactStatus,
    /// Free-text note, if any.
    pub note: Option<String>,
    /// Desired next follow-up date, if any.
    pub next_action_on: Option<NaiveDate>,
    /// Timestamp of the last logged contact, if any.
    pub last_contacted_at: Option<DateTime<Utc>>,
    /// Soft-archive timestamp, if any.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Creates a contact from draft data. Called by repositories once the
    /// identifier has been assigned; the team stamp comes from the caller's
    /// context and is immutable afterwards.
    #[must_use]
    pub fn create(new: NewContact, id: ContactId, team_id: TeamId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            team_id,
            owner_id: new.owner_id,
            kind: new.kind,
            name: new.name,
            company: new.company,
            email: new.email,
            phone: new.phone,
            tags: new.tags,
            priority: new.priority,
            status: ContactStatus::Pending,
            note: new.note,
            next_action_on: new.next_action_on,
            last_contacted_at: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a contact from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedContactData) -> Self {
        Self {
            id: data.id,
            team_id: data.team_id,
            owner_id: data.owner_id,
            kind: data.kind,
            name: data.name,
            company: data.company,
            email: data.email,
            phone: data.phone,
            tags: data.tags,
            priority: data.priority,
            status: data.status,
            note: data.note,
            next_action_on: data.next_action_on,
            last_contacted_at: data.last_contacted_at,
            archived_at: data.archived_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns whether the contact is a person or a company.
    #[must_use]
    pub const fn kind(&self) -> ContactKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the company name, if any.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the email address, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the free-form tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the contact priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the follow-up status.
    #[must_use]
    pub const fn status(&self) -> ContactStatus {
        self.status
    }

    /// Returns the free-text note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the desired next follow-up date, if any.
    #[must_use]
    pub const fn next_action_on(&self) -> Option<NaiveDate> {
        self.next_action_on
    }

    /// Returns the timestamp of the last logged contact, if any.
    #[must_use]
    pub const fn last_contacted_at(&self) -> Option<DateTime<Utc>> {
        self.last_contacted_at
    }

    /// Returns the soft-archive timestamp, if any.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
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

    /// Sets or clears the desired next follow-up date (user edit path).
    /// Callers route the change through the reconciler afterwards.
    pub fn set_next_action_on(&mut self, date: Option<NaiveDate>, clock: &impl Clock) {
        self.next_action_on = date;
        self.touch(clock);
    }

    /// Changes the contact priority (user edit path).
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Marks the contact as awaiting follow-up. Reconciler only.
    pub(crate) fn mark_pending(&mut self, clock: &impl Clock) {
        self.status = ContactStatus::Pending;
        self.touch(clock);
    }

    /// Marks the contact's follow-up as done. Reconciler only.
    pub(crate) fn mark_completed(&mut self, clock: &impl Clock) {
        self.status = ContactStatus::Completed;
        self.touch(clock);
    }

    /// Moves the next-action date to track a postponed task. Reconciler only.
    pub(crate) fn track_postponed_due_date(&mut self, due_on: NaiveDate, clock: &impl Clock) {
        self.next_action_on = Some(due_on);
        self.status = ContactStatus::Pending;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl TenantScoped for Contact {
    fn team_id(&self) -> TeamId {
        self.team_id
    }
}
