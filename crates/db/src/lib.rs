//! Postgres persistence for push tracking.
//!
//! - [`models`]: `FromRow` row structs and their conversions to core types.
//! - [`repositories`]: zero-sized repos with async queries over `&PgPool`.
//! - [`stores`]: the core collaborator traits implemented on a pool.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod stores;

pub use stores::{collaborators, PgDirectory, PgPushHistory, PgVersionMetadata};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the connection.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Map a `sqlx` failure onto the core store error.
///
/// `RowNotFound` keeps its "not found" meaning; everything else is a data
/// access error.
pub fn store_error(err: sqlx::Error) -> pushtrack_core::StoreError {
    match err {
        sqlx::Error::RowNotFound => pushtrack_core::StoreError::NotFound(err.to_string()),
        other => pushtrack_core::StoreError::Data(other.to_string()),
    }
}
