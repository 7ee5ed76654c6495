//! `PostgreSQL` repository implementations for contact and task storage.

use super::{
    models::{ContactChangeset, ContactRow, NewContactRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{contacts, tasks},
};
use crate::followup::{
    domain::{
        Contact, ContactId, ContactKind, ContactStatus, FOLLOW_UP_TITLE, NewContact, NewTask,
        PersistedContactData, PersistedTaskData, Priority, Task, TaskId,
    },
    ports::{
        ContactRepository, FollowupRepositoryError, FollowupRepositoryResult, TaskRepository,
    },
};
use crate::tenant::{self, TeamId, TenantContext, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by follow-up adapters.
pub type FollowupPgPool = Pool<ConnectionManager<PgConnection>>;

async fn run_blocking<F, T>(pool: &FollowupPgPool, f: F) -> FollowupRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> FollowupRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(FollowupRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(FollowupRepositoryError::persistence)?
}

/// `PostgreSQL`-backed contact repository.
#[derive(Debug, Clone)]
pub struct PostgresContactRepository {
    pool: FollowupPgPool,
}

impl PostgresContactRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FollowupPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn create(
        &self,
        ctx: &TenantContext,
        new: NewContact,
    ) -> FollowupRepositoryResult<Contact> {
        let new_row = new_contact_row(new, ctx, Utc::now());
        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(contacts::table)
                .values(&new_row)
                .returning(ContactRow::as_returning())
                .get_result::<ContactRow>(connection)
                .map_err(FollowupRepositoryError::persistence)?;
            row_to_contact(row)
        })
        .await
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        id: ContactId,
    ) -> FollowupRepositoryResult<Option<Contact>> {
        let team = ctx.team();
        run_blocking(&self.pool, move |connection| {
            let row = contacts::table
                .filter(contacts::id.eq(id.into_inner()))
                .filter(contacts::team_id.eq(team.into_inner()))
                .select(ContactRow::as_select())
                .first::<ContactRow>(connection)
                .optional()
                .map_err(FollowupRepositoryError::persistence)?;
            row.map(row_to_contact).transpose()
        })
        .await
    }

    async fn update(
        &self,
        ctx: &TenantContext,
        contact: &Contact,
    ) -> FollowupRepositoryResult<()> {
        tenant::ensure_scope(ctx, contact)?;
        let id = contact.id();
        let team = ctx.team();
        let changeset = contact_changeset(contact);
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                contacts::table
                    .filter(contacts::id.eq(id.into_inner()))
                    .filter(contacts::team_id.eq(team.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(FollowupRepositoryError::persistence)?;
            if affected == 0 {
                return Err(FollowupRepositoryError::ContactNotFound(id));
            }
            Ok(())
        })
        .await
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: FollowupPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FollowupPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, ctx: &TenantContext, new: NewTask) -> FollowupRepositoryResult<Task> {
        let new_row = new_task_row(new, ctx, Utc::now());
        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(FollowupRepositoryError::persistence)?;
            Ok(row_to_task(row))
        })
        .await
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        id: TaskId,
    ) -> FollowupRepositoryResult<Option<Task>> {
        let team = ctx.team();
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::team_id.eq(team.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(FollowupRepositoryError::persistence)?;
            Ok(row.map(row_to_task))
        })
        .await
    }

    async fn update(&self, ctx: &TenantContext, task: &Task) -> FollowupRepositoryResult<()> {
        tenant::ensure_scope(ctx, task)?;
        let id = task.id();
        let team = ctx.team();
        let changeset = task_changeset(task);
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::team_id.eq(team.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(FollowupRepositoryError::persistence)?;
            if affected == 0 {
                return Err(FollowupRepositoryError::TaskNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &TenantContext, id: TaskId) -> FollowupRepositoryResult<()> {
        let team = ctx.team();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::team_id.eq(team.into_inner())),
            )
            .execute(connection)
            .map_err(FollowupRepositoryError::persistence)?;
            if affected == 0 {
                return Err(FollowupRepositoryError::TaskNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn pending_follow_ups(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupRepositoryResult<Vec<Task>> {
        let team = ctx.team();
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::team_id.eq(team.into_inner()))
                .filter(tasks::contact_id.eq(Some(contact_id.into_inner())))
                .filter(tasks::title.eq(FOLLOW_UP_TITLE))
                .filter(tasks::done_at.is_null())
                .order(tasks::id.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(FollowupRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_task).collect())
        })
        .await
    }

    async fn latest_completed_follow_up(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
    ) -> FollowupRepositoryResult<Option<Task>> {
        let team = ctx.team();
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::team_id.eq(team.into_inner()))
                .filter(tasks::contact_id.eq(Some(contact_id.into_inner())))
                .filter(tasks::title.eq(FOLLOW_UP_TITLE))
                .filter(tasks::done_at.is_not_null())
                .order(tasks::id.desc())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(FollowupRepositoryError::persistence)?;
            Ok(row.map(row_to_task))
        })
        .await
    }

    async fn complete_pending_follow_ups(
        &self,
        ctx: &TenantContext,
        contact_id: ContactId,
        at: DateTime<Utc>,
    ) -> FollowupRepositoryResult<usize> {
        let team = ctx.team();
        run_blocking(&self.pool, move |connection| {
            diesel::update(
                tasks::table
                    .filter(tasks::team_id.eq(team.into_inner()))
                    .filter(tasks::contact_id.eq(Some(contact_id.into_inner())))
                    .filter(tasks::title.eq(FOLLOW_UP_TITLE))
                    .filter(tasks::done_at.is_null()),
            )
            .set((tasks::done_at.eq(Some(at)), tasks::updated_at.eq(at)))
            .execute(connection)
            .map_err(FollowupRepositoryError::persistence)
        })
        .await
    }
}

fn new_contact_row(new: NewContact, ctx: &TenantContext, now: DateTime<Utc>) -> NewContactRow {
    NewContactRow {
        team_id: ctx.team().into_inner(),
        owner_id: new.owner_id.into_inner(),
        kind: new.kind.as_str().to_owned(),
        name: new.name,
        company: new.company,
        email: new.email,
        phone: new.phone,
        tags: serde_json::Value::from(new.tags),
        priority: new.priority.as_str().to_owned(),
        status: ContactStatus::Pending.as_str().to_owned(),
        note: new.note,
        next_action_on: new.next_action_on,
        created_at: now,
        updated_at: now,
    }
}

fn contact_changeset(contact: &Contact) -> ContactChangeset {
    ContactChangeset {
        name: contact.name().to_owned(),
        company: contact.company().map(ToOwned::to_owned),
        email: contact.email().map(ToOwned::to_owned),
        phone: contact.phone().map(ToOwned::to_owned),
        tags: serde_json::Value::from(contact.tags().to_vec()),
        priority: contact.priority().as_str().to_owned(),
        status: contact.status().as_str().to_owned(),
        note: contact.note().map(ToOwned::to_owned),
        next_action_on: Some(contact.next_action_on()),
        last_contacted_at: Some(contact.last_contacted_at()),
        archived_at: Some(contact.archived_at()),
        updated_at: contact.updated_at(),
    }
}

fn row_to_contact(row: ContactRow) -> FollowupRepositoryResult<Contact> {
    let kind =
        ContactKind::try_from(row.kind.as_str()).map_err(FollowupRepositoryError::persistence)?;
    let status = ContactStatus::try_from(row.status.as_str())
        .map_err(FollowupRepositoryError::persistence)?;
    let tags = serde_json::from_value::<Vec<String>>(row.tags)
        .map_err(FollowupRepositoryError::persistence)?;

    Ok(Contact::from_persisted(PersistedContactData {
        id: ContactId::new(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        owner_id: UserId::from_uuid(row.owner_id),
        kind,
        name: row.name,
        company: row.company,
        email: row.email,
        phone: row.phone,
        tags,
        priority: Priority::parse_lossy(&row.priority),
        status,
        note: row.note,
        next_action_on: row.next_action_on,
        last_contacted_at: row.last_contacted_at,
        archived_at: row.archived_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn new_task_row(new: NewTask, ctx: &TenantContext, now: DateTime<Utc>) -> NewTaskRow {
    NewTaskRow {
        team_id: ctx.team().into_inner(),
        assignee_id: new.assignee_id.into_inner(),
        contact_id: new.contact_id.map(ContactId::into_inner),
        deal_id: new.deal_id.map(crate::pipeline::domain::DealId::into_inner),
        title: new.title,
        priority: new.priority.as_str().to_owned(),
        due_on: new.due_on,
        created_at: now,
        updated_at: now,
    }
}

fn task_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_on: task.due_on(),
        done_at: Some(task.done_at()),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        assignee_id: UserId::from_uuid(row.assignee_id),
        contact_id: row.contact_id.map(ContactId::new),
        deal_id: row.deal_id.map(crate::pipeline::domain::DealId::new),
        title: row.title,
        priority: Priority::parse_lossy(&row.priority),
        due_on: row.due_on,
        done_at: row.done_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
