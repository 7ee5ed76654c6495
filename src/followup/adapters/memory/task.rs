//! In-memory task repository for follow-up tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::followup::{
    domain::{ContactId, NewTask, Task, TaskId},
    ports::{FollowupRepositoryError, FollowupRepositoryResult, TaskRepository},
};
use crate::tenant::{self, TenantContext, TenantScoped};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    next_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> FollowupRepositoryError {
    FollowupRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects a contact's follow-up tasks matching a completion predicate,
/// newest id first.
fn follow_ups_desc(
    state: &InMemoryTaskState,
    ctx: &TenantContext,
    contact_id: ContactId,
    pending: bool,
) -> Vec<Task> {
    let mut matches: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| {
            task.team_id() == ctx.team()
                && task.contact_id() == Some(contact_id)
                && task.is_follow_up()
                && task.is_pending() == pending
        })
        .cloned()
        .collect();
    matches.sort_by(|a, b| b.id().cmp(&a.id()));
    matches
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, ctx: &TenantContext, new: NewTask) -> FollowupRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.next_id += 1;
        let id = TaskId::new(state.next_id);
        let task = Task::create(new, id, ctx.team(), Utc::now());
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        id: TaskId,
    ) -> FollowupRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.team_id() == ctx.team())
            .cloned())
    }

    async fn update(&self, ctx: &TenantContext, task: &Task) -> FollowupRepositoryResult<()> {
        tenant::ensure_scope(ctx, task)?;
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(FollowupRepositoryError::TaskNotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, ctx: &TenantContext, id: TaskId) -> FollowupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let in_team = state
            .tasks
            .get(&id)
            .is_some_and(|task| task.team_id() == ctx.team());
        if !in_team {
            return Err(FollowupRepositoryError::TaskNotFound(id));
        }
        state.tasks.remove(&id);
        Ok(())
    }

    async fn pending_follow_ups(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(follow_ups_desc(&state, ctx, contact_id, true))
    }

    async fn latest_completed_follow_up(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(follow_ups_desc(&state, ctx, contact_id, false)
            .into_iter()
            .next())
    }

    async fn complete_pending_follow_ups(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
        at: DateTime<Utc>,
    ) -> FollowupRepositoryResult<usize> {
        let mut state = self.state.write().map_err(lock_error)?;
        let pending_ids: Vec<TaskId> = follow_ups_desc(&state, ctx, contact_id, true)
            .into_iter()
            .map(|task| task.id())
            .collect();
        let affected = pending_ids.len();
        for id in pending_ids {
            if let Some(task) = state.tasks.get_mut(&id) {
                task.force_done_at(at);
            }
        }
        Ok(affected)
    }
}
