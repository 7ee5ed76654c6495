//! Reconciliation between contact follow-up state and follow-up tasks.
//!
//! The reconciler owns two invariants:
//!
//! 1. A contact has at most one pending follow-up task at any time.
//! 2. That task's due date and priority mirror the contact's next-action
//!    date and priority.
//!
//! Contact edits flow forward through [`FollowupReconciler::on_next_action_changed`];
//! task completion and postponement flow backward through
//! [`FollowupReconciler::complete_task`] and [`FollowupReconciler::postpone_task`].
//! The two directions are distinct entry points and never recurse into each
//! other.

use crate::followup::{
    domain::{Contact, ContactId, NewTask, Task, TaskId},
    ports::{ContactRepository, FollowupRepositoryError, FollowupRepositoryResult, TaskRepository},
};
use crate::tenant::{CrossTenantViolation, TenantContext};
use log::{debug, info};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for follow-up reconciliation.
#[derive(Debug, Error)]
pub enum FollowupServiceError {
    /// The operation addressed an entity outside the caller's team.
    #[error(transparent)]
    Tenant(#[from] CrossTenantViolation),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] FollowupRepositoryError),
}

/// Result type for follow-up service operations.
pub type FollowupServiceResult<T> = Result<T, FollowupServiceError>;

/// Keeps each contact's follow-up task synchronized with the contact.
#[derive(Clone)]
pub struct FollowupReconciler<CR, TR, C>
where
    CR: ContactRepository,
    TR: TaskRepository,
    C: Clock + Send + Sync,
{
    contacts: Arc<CR>,
    tasks: Arc<TR>,
    clock: Arc<C>,
}

impl<CR, TR, C> FollowupReconciler<CR, TR, C>
where
    CR: ContactRepository,
    TR: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new reconciler over the given repositories.
    #[must_use]
    pub const fn new(contacts: Arc<CR>, tasks: Arc<TR>, clock: Arc<C>) -> Self {
        Self {
            contacts,
            tasks,
            clock,
        }
    }

    /// Re-synchronizes a contact's follow-up task after its next-action date
    /// or priority changed.
    ///
    /// A contact without a next-action date is left alone: no task is
    /// created or removed. Otherwise the contact returns to pending and
    /// exactly one pending follow-up task remains afterwards, carrying the
    /// contact's current due date and priority. Duplicate pending tasks
    /// (data drift) are repaired silently by keeping the newest row.
    ///
    /// # Errors
    ///
    /// Returns [`FollowupServiceError::Repository`] when the contact is
    /// missing from the caller's team or persistence fails.
    pub async fn on_next_action_changed(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupServiceResult<()> {
        let mut contact = self.load_contact(ctx, contact_id).await?;
        let Some(due_on) = contact.next_action_on() else {
            return Ok(());
        };

        contact.mark_pending(&*self.clock);
        self.contacts.update(ctx, &contact).await?;

        let mut pending = self.tasks.pending_follow_ups(ctx, contact_id).await?;
        let newest = pending.first().cloned();
        if pending.len() > 1 {
            debug!(
                "repairing follow-up drift for contact {contact_id}: {} duplicate pending tasks",
                pending.len() - 1
            );
            for stale in pending.drain(1..) {
                self.tasks.delete(ctx, stale.id()).await?;
            }
        }

        if let Some(mut task) = newest {
            task.sync_with_contact(due_on, contact.priority(), &*self.clock);
            self.tasks.update(ctx, &task).await?;
            return Ok(());
        }

        // No pending task: prefer reopening the latest completed one over
        // creating a new row, so task history stays on a single record.
        if let Some(mut completed) = self
            .tasks
            .latest_completed_follow_up(ctx, contact_id)
            .await?
        {
            completed.reopen(&*self.clock);
            completed.sync_with_contact(due_on, contact.priority(), &*self.clock);
            self.tasks.update(ctx, &completed).await?;
            return Ok(());
        }

        let created = self
            .tasks
            .create(ctx, NewTask::follow_up(&contact, due_on))
            .await?;
        info!("created follow-up task {} for contact {contact_id}", created.id());
        Ok(())
    }

    /// Marks a task completed. When the task links a contact, the contact
    /// flips to completed and every remaining pending follow-up for it is
    /// closed in bulk (drift tolerant).
    ///
    /// # Errors
    ///
    /// Returns [`FollowupServiceError::Repository`] when the task is missing
    /// from the caller's team or persistence fails.
    pub async fn complete_task(
        &self,
        ctx: &TenantContext,
        task_id: TaskId,
    ) -> FollowupServiceResult<Task> {
        let mut task = self.load_task(ctx, task_id).await?;
        task.complete(&*self.clock);
        self.tasks.update(ctx, &task).await?;

        if let Some(contact_id) = task.contact_id() {
            let mut contact = self.load_contact(ctx, contact_id).await?;
            contact.mark_completed(&*self.clock);
            self.contacts.update(ctx, &contact).await?;
            self.tasks
                .complete_pending_follow_ups(ctx, contact_id, self.clock.utc())
                .await?;
        }
        Ok(task)
    }

    /// Pushes a task's due date out by `days`. When the task links a
    /// contact, the contact returns to pending and its next-action date
    /// tracks the new due date. This is the task-to-contact direction; it
    /// does not re-enter [`Self::on_next_action_changed`].
    ///
    /// # Errors
    ///
    /// Returns [`FollowupServiceError::Repository`] when the task is missing
    /// from the caller's team or persistence fails.
    pub async fn postpone_task(
        &self,
        ctx: &TenantContext,
        task_id: TaskId,
        days: u32,
    ) -> FollowupServiceResult<Task> {
        let mut task = self.load_task(ctx, task_id).await?;
        task.postpone(days, &*self.clock);
        self.tasks.update(ctx, &task).await?;

        if let Some(contact_id) = task.contact_id() {
            let mut contact = self.load_contact(ctx, contact_id).await?;
            contact.track_postponed_due_date(task.due_on(), &*self.clock);
            self.contacts.update(ctx, &contact).await?;
        }
        Ok(task)
    }

    async fn load_contact(
        &self,
        ctx: &TenantContext,
        id: ContactId,
    ) -> FollowupServiceResult<Contact> {
        let found: FollowupRepositoryResult<Option<Contact>> = self.contacts.find(ctx, id).await;
        Ok(found?.ok_or(FollowupRepositoryError::ContactNotFound(id))?)
    }

    async fn load_task(&self, ctx: &TenantContext, id: TaskId) -> FollowupServiceResult<Task> {
        let found: FollowupRepositoryResult<Option<Task>> = self.tasks.find(ctx, id).await;
        Ok(found?.ok_or(FollowupRepositoryError::TaskNotFound(id))?)
    }
}
