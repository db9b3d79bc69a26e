//! Postgres persistence for the roofwatch analytic core.
//!
//! - [`repositories`]: zero-sized repos with async query methods taking `&PgPool`.
//! - [`stores`]: [`PgStores`], adapting the repos to the core store ports.
//! - [`memory`]: [`InMemoryStore`], a process-local implementation of the
//!   same ports for tests.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod stores;

pub use memory::InMemoryStore;
pub use stores::PgStores;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded SQL migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
