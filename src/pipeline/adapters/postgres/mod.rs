//! `PostgreSQL` adapters for deal pipeline persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PipelinePgPool, PostgresDealRepository};
