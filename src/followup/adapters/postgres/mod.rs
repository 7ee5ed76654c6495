//! `PostgreSQL` adapters for follow-up persistence.

mod models;
mod repository;
mod schema;

pub use repository::{FollowupPgPool, PostgresContactRepository, PostgresTaskRepository};
