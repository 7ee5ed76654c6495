//! Diesel row models for contact and task persistence.

use super::schema::{contacts, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for contact records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContactRow {
    /// Storage-assigned contact identifier.
    pub id: i64,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Person or company.
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Company name.
    pub company: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Free-form tags as a JSON array.
    pub tags: Value,
    /// Contact priority.
    pub priority: String,
    /// Follow-up status.
    pub status: String,
    /// Free-text note.
    pub note: Option<String>,
    /// Desired next follow-up date.
    pub next_action_on: Option<NaiveDate>,
    /// Timestamp of the last logged contact.
    pub last_contacted_at: Option<DateTime<Utc>>,
    /// Soft-archive timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for contact records; the database assigns the identifier.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub struct NewContactRow {
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Person or company.
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Company name.
    pub company: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Free-form tags as a JSON array.
    pub tags: Value,
    /// Contact priority.
    pub priority: String,
    /// Follow-up status.
    pub status: String,
    /// Free-text note.
    pub note: Option<String>,
    /// Desired next follow-up date.
    pub next_action_on: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update changeset for contact records. The team stamp is deliberately
/// absent: it is set at insert and never writable afterwards.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts)]
pub struct ContactChangeset {
    /// Display name.
    pub name: String,
    /// Company name.
    pub company: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Free-form tags as a JSON array.
    pub tags: Value,
    /// Contact priority.
    pub priority: String,
    /// Follow-up status.
    pub status: String,
    /// Free-text note.
    pub note: Option<String>,
    /// Desired next follow-up date.
    pub next_action_on: Option<Option<NaiveDate>>,
    /// Timestamp of the last logged contact.
    pub last_contacted_at: Option<Option<DateTime<Utc>>>,
    /// Soft-archive timestamp.
    pub archived_at: Option<Option<DateTime<Utc>>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Storage-assigned task identifier.
    pub id: i64,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Assigned user.
    pub assignee_id: uuid::Uuid,
    /// Linked contact.
    pub contact_id: Option<i64>,
    /// Linked deal.
    pub deal_id: Option<i64>,
    /// Task title.
    pub title: String,
    /// Task priority.
    pub priority: String,
    /// Due date.
    pub due_on: NaiveDate,
    /// Completion timestamp.
    pub done_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records; the database assigns the identifier.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Assigned user.
    pub assignee_id: uuid::Uuid,
    /// Linked contact.
    pub contact_id: Option<i64>,
    /// Linked deal.
    pub deal_id: Option<i64>,
    /// Task title.
    pub title: String,
    /// Task priority.
    pub priority: String,
    /// Due date.
    pub due_on: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update changeset for task records. The team stamp is deliberately
/// absent: it is set at insert and never writable afterwards.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Task priority.
    pub priority: String,
    /// Due date.
    pub due_on: NaiveDate,
    /// Completion timestamp.
    pub done_at: Option<Option<DateTime<Utc>>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
