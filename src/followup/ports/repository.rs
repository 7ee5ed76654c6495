//! Repository ports for contact and task persistence.

use crate::followup::domain::{Contact, ContactId, NewContact, NewTask, Task, TaskId};
use crate::tenant::{CrossTenantViolation, TenantContext};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for follow-up repository operations.
pub type FollowupRepositoryResult<T> = Result<T, FollowupRepositoryError>;

/// Contact persistence contract. All queries are scoped to the context's
/// team; a contact belonging to another team is indistinguishable from a
/// missing one.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stores a new contact, assigning its identifier and stamping the
    /// caller's team.
    async fn create(
        &self,
        ctx: &TenantContext,
        new: NewContact,
    ) -> FollowupRepositoryResult<Contact>;

    /// Finds a contact by identifier within the caller's team.
    ///
    /// Returns `None` when the contact does not exist in this team.
    async fn find(
        &self,
        ctx: &TenantContext,
        id: ContactId,
    ) -> FollowupRepositoryResult<Option<Contact>>;

    /// Persists changes to an existing contact.
    ///
    /// # Errors
    ///
    /// Returns [`FollowupRepositoryError::Tenant`] when the aggregate's team
    /// stamp does not match the context, and
    /// [`FollowupRepositoryError::ContactNotFound`] when the row is absent.
    async fn update(&self, ctx: &TenantContext, contact: &Contact)
    -> FollowupRepositoryResult<()>;
}

/// Task persistence contract, including the follow-up specific queries the
/// reconciler drives.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task, assigning its identifier and stamping the caller's
    /// team.
    async fn create(&self, ctx: &TenantContext, new: NewTask) -> FollowupRepositoryResult<Task>;

    /// Finds a task by identifier within the caller's team.
    ///
    /// Returns `None` when the task does not exist in this team.
    async fn find(&self, ctx: &TenantContext, id: TaskId)
    -> FollowupRepositoryResult<Option<Task>>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`FollowupRepositoryError::Tenant`] on a team-stamp mismatch
    /// and [`FollowupRepositoryError::TaskNotFound`] when the row is absent.
    async fn update(&self, ctx: &TenantContext, task: &Task) -> FollowupRepositoryResult<()>;

    /// Deletes a task within the caller's team.
    ///
    /// # Errors
    ///
    /// Returns [`FollowupRepositoryError::TaskNotFound`] when the row is
    /// absent in this team.
    async fn delete(&self, ctx: &TenantContext, id: TaskId) -> FollowupRepositoryResult<()>;

    /// Returns all pending follow-up tasks for a contact, newest id first.
    ///
    /// A well-reconciled contact has at most one; callers must tolerate
    /// more, which signals data drift.
    async fn pending_follow_ups(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupRepositoryResult<Vec<Task>>;

    /// Returns the most recently created completed follow-up task for a
    /// contact, if any.
    async fn latest_completed_follow_up(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupRepositoryResult<Option<Task>>;

    /// Stamps every pending follow-up task of a contact as completed at the
    /// given time. Returns the number of rows affected.
    async fn complete_pending_follow_ups(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
        at: DateTime<Utc>,
    ) -> FollowupRepositoryResult<usize>;
}

/// Errors returned by follow-up repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FollowupRepositoryError {
    /// The contact was not found in the caller's team.
    #[error("contact not found: {0}")]
    ContactNotFound(ContactId),

    /// The task was not found in the caller's team.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A write addressed an entity stamped with another team.
    #[error(transparent)]
    Tenant(#[from] CrossTenantViolation),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FollowupRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
