//! `PostgreSQL` repository implementation for deal pipeline storage.

use super::{
    models::{DealChangeset, DealRow, NewDealRow},
    schema::deals,
};
use crate::followup::domain::ContactId;
use crate::pipeline::{
    domain::{Deal, DealId, NewDeal, PersistedDealData, Probability, Stage},
    ports::{DealRepository, PipelineRepositoryError, PipelineRepositoryResult},
};
use crate::tenant::{self, TeamId, TenantContext, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by pipeline adapters.
pub type PipelinePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed deal repository.
#[derive(Debug, Clone)]
pub struct PostgresDealRepository {
    pool: PipelinePgPool,
}

impl PostgresDealRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PipelinePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PipelineRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PipelineRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PipelineRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PipelineRepositoryError::persistence)?
    }
}

#[async_trait]
impl DealRepository for PostgresDealRepository {
    async fn create(&self, ctx: &TenantContext, new: NewDeal) -> PipelineRepositoryResult<Deal> {
        let new_row = new_deal_row(new, ctx, Utc::now());
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(deals::table)
                .values(&new_row)
                .returning(DealRow::as_returning())
                .get_result::<DealRow>(connection)
                .map_err(PipelineRepositoryError::persistence)?;
            row_to_deal(row)
        })
        .await
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        id: DealId,
    ) -> PipelineRepositoryResult<Option<Deal>> {
        let team = ctx.team();
        self.run_blocking(move |connection| {
            let row = deals::table
                .filter(deals::id.eq(id.into_inner()))
                .filter(deals::team_id.eq(team.into_inner()))
                .select(DealRow::as_select())
                .first::<DealRow>(connection)
                .optional()
                .map_err(PipelineRepositoryError::persistence)?;
            row.map(row_to_deal).transpose()
        })
        .await
    }

    async fn update(&self, ctx: &TenantContext, deal: &Deal) -> PipelineRepositoryResult<()> {
        tenant::ensure_scope(ctx, deal)?;
        let id = deal.id();
        let team = ctx.team();
        let changeset = deal_changeset(deal);
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                deals::table
                    .filter(deals::id.eq(id.into_inner()))
                    .filter(deals::team_id.eq(team.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(PipelineRepositoryError::persistence)?;
            if affected == 0 {
                return Err(PipelineRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn max_order_index(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<Option<i32>> {
        let team = ctx.team();
        self.run_blocking(move |connection| {
            deals::table
                .filter(deals::team_id.eq(team.into_inner()))
                .filter(deals::stage.eq(stage.as_str()))
                .select(diesel::dsl::max(deals::order_index))
                .first::<Option<i32>>(connection)
                .map_err(PipelineRepositoryError::persistence)
        })
        .await
    }

    async fn shift_bucket_from(
        &self,
        ctx: &TenantContext,
        stage: Stage,
        from_index: i32,
        by: i32,
    ) -> PipelineRepositoryResult<usize> {
        let team = ctx.team();
        self.run_blocking(move |connection| {
            // The whole max/shift/assign sequence must be serialisable per
            // bucket: lock the bucket rows, then apply the shift as one
            // statement.
            connection
                .transaction::<usize, DieselError, _>(|conn| {
                    let _locked = deals::table
                        .filter(deals::team_id.eq(team.into_inner()))
                        .filter(deals::stage.eq(stage.as_str()))
                        .select(deals::id)
                        .for_update()
                        .load::<i64>(conn)?;

                    diesel::update(
                        deals::table
                            .filter(deals::team_id.eq(team.into_inner()))
                            .filter(deals::stage.eq(stage.as_str()))
                            .filter(deals::order_index.ge(from_index)),
                    )
                    .set(deals::order_index.eq(deals::order_index + by))
                    .execute(conn)
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                        PipelineRepositoryError::OrderingConflict { team, stage }
                    }
                    _ => PipelineRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn list_stage(
        &self,
        ctx: &TenantContext,
        stage: Stage,
    ) -> PipelineRepositoryResult<Vec<Deal>> {
        let team = ctx.team();
        self.run_blocking(move |connection| {
            let rows = deals::table
                .filter(deals::team_id.eq(team.into_inner()))
                .filter(deals::stage.eq(stage.as_str()))
                .filter(deals::archived_at.is_null())
                .order(deals::order_index.asc())
                .select(DealRow::as_select())
                .load::<DealRow>(connection)
                .map_err(PipelineRepositoryError::persistence)?;
            rows.into_iter().map(row_to_deal).collect()
        })
        .await
    }
}

fn new_deal_row(new: NewDeal, ctx: &TenantContext, now: DateTime<Utc>) -> NewDealRow {
    NewDealRow {
        team_id: ctx.team().into_inner(),
        owner_id: new.owner_id.into_inner(),
        contact_id: new.contact_id.into_inner(),
        title: new.title,
        amount: i64::from(new.amount),
        stage: new.stage.as_str().to_owned(),
        probability: i16::from(new.probability.value()),
        expected_close_on: new.expected_close_on,
        order_index: new.order_index,
        created_at: now,
        updated_at: now,
    }
}

fn deal_changeset(deal: &Deal) -> DealChangeset {
    DealChangeset {
        title: deal.title().to_owned(),
        amount: i64::from(deal.amount()),
        stage: deal.stage().as_str().to_owned(),
        probability: i16::from(deal.probability().value()),
        expected_close_on: Some(deal.expected_close_on()),
        order_index: deal.order_index(),
        lost_reason: Some(deal.lost_reason().map(ToOwned::to_owned)),
        archived_at: Some(deal.archived_at()),
        updated_at: deal.updated_at(),
    }
}

fn row_to_deal(row: DealRow) -> PipelineRepositoryResult<Deal> {
    let stage =
        Stage::try_from(row.stage.as_str()).map_err(PipelineRepositoryError::persistence)?;
    let amount = u32::try_from(row.amount).map_err(PipelineRepositoryError::persistence)?;
    let raw_probability =
        u8::try_from(row.probability).map_err(PipelineRepositoryError::persistence)?;
    let probability =
        Probability::new(raw_probability).map_err(PipelineRepositoryError::persistence)?;

    Ok(Deal::from_persisted(PersistedDealData {
        id: DealId::new(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        owner_id: UserId::from_uuid(row.owner_id),
        contact_id: ContactId::new(row.contact_id),
        title: row.title,
        amount,
        stage,
        probability,
        expected_close_on: row.expected_close_on,
        order_index: row.order_index,
        lost_reason: row.lost_reason,
        archived_at: row.archived_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
