//! SQLite persistence for SIGMA user records.
//!
//! All SQL lives in this crate. Callers get strongly-typed
//! [`UserRecord`](sigma_core::user::UserRecord)s, never raw rows.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;

pub use error::StorageError;
pub use schema::run_migrations;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL (e.g. `sqlite://sigma.db`).
///
/// The database file is created if missing. `timeout` bounds both pool
/// acquisition and SQLite's busy wait, so no store operation blocks
/// indefinitely behind a concurrent writer.
pub async fn create_pool(database_url: &str, timeout: Duration) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(timeout);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
