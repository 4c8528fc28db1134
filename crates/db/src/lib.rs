//! Inkstone persistence layer.
//!
//! PostgreSQL pool helpers plus the `projects` repository. A project row
//! carries the full serialized project as a JSONB document — the scalar
//! columns are denormalized copies for listing and ordering only, and
//! reads reconstruct the project from the document alone.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod repositories;

pub use error::StoreError;
pub use repositories::ProjectRepo;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
