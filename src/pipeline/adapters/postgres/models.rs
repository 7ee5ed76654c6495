//! Diesel row models for deal persistence.

use super::schema::deals;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for deal records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DealRow {
    /// Storage-assigned deal identifier.
    pub id: i64,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Attached contact.
    pub contact_id: i64,
    /// Deal title.
    pub title: String,
    /// Deal amount.
    pub amount: i64,
    /// Current pipeline stage.
    pub stage: String,
    /// Win probability in whole percent.
    pub probability: i16,
    /// Expected close date.
    pub expected_close_on: Option<NaiveDate>,
    /// Position within the (team, stage) bucket.
    pub order_index: i32,
    /// Reason recorded on loss.
    pub lost_reason: Option<String>,
    /// Soft-archive timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for deal records; the database assigns the identifier.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deals)]
pub struct NewDealRow {
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Attached contact.
    pub contact_id: i64,
    /// Deal title.
    pub title: String,
    /// Deal amount.
    pub amount: i64,
    /// Current pipeline stage.
    pub stage: String,
    /// Win probability in whole percent.
    pub probability: i16,
    /// Expected close date.
    pub expected_close_on: Option<NaiveDate>,
    /// Position within the (team, stage) bucket.
    pub order_index: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update changeset for deal records. The team stamp is deliberately
/// absent: it is set at insert and never writable afterwards.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = deals)]
pub struct DealChangeset {
    /// Deal title.
    pub title: String,
    /// Deal amount.
    pub amount: i64,
    /// Current pipeline stage.
    pub stage: String,
    /// Win probability in whole percent.
    pub probability: i16,
    /// Expected close date.
    pub expected_close_on: Option<Option<NaiveDate>>,
    /// Position within the (team, stage) bucket.
    pub order_index: i32,
    /// Reason recorded on loss.
    pub lost_reason: Option<Option<String>>,
    /// Soft-archive timestamp.
    pub archived_at: Option<Option<DateTime<Utc>>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
