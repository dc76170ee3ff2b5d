//! Additive schema management for the `users` table.
//!
//! Databases created by earlier releases may lack optional columns. Instead
//! of versioned migrations, the table is created if absent and every known
//! column is added if missing. Existing rows keep their values, except date
//! text that cannot be read back as a calendar date.

use crate::DbPool;

const CREATE_USERS: &str = "\
    CREATE TABLE IF NOT EXISTS users ( \
        user_id INTEGER PRIMARY KEY, \
        balance INTEGER NOT NULL DEFAULT 0, \
        total_checkins INTEGER NOT NULL DEFAULT 0, \
        last_checkin TEXT, \
        joined_at TEXT \
    )";

/// Columns beyond the primary key, with the definition used when adding them
/// to an existing table.
const USER_COLUMNS: &[(&str, &str)] = &[
    ("balance", "INTEGER NOT NULL DEFAULT 0"),
    ("total_checkins", "INTEGER NOT NULL DEFAULT 0"),
    ("last_checkin", "TEXT"),
    ("joined_at", "TEXT"),
];

/// Date columns that must hold `YYYY-MM-DD` text or NULL.
const DATE_COLUMNS: &[&str] = &["last_checkin", "joined_at"];

/// Create the `users` table if needed, add any missing columns and clean up
/// date values that cannot be read back as calendar dates.
///
/// Safe to run on every startup.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;

    let existing = user_columns(pool).await?;
    for (name, definition) in USER_COLUMNS {
        if existing.iter().any(|c| c == name) {
            continue;
        }
        let statement = format!("ALTER TABLE users ADD COLUMN {name} {definition}");
        sqlx::query(&statement).execute(pool).await?;
        tracing::info!(column = name, "Added missing column to users table");
    }

    normalize_dates(pool).await
}

/// Rewrite date columns into plain `YYYY-MM-DD` text.
///
/// Values SQLite understands as a date-time are truncated to their date;
/// anything else (e.g. a placeholder label) becomes NULL, meaning unknown.
async fn normalize_dates(pool: &DbPool) -> Result<(), sqlx::Error> {
    for column in DATE_COLUMNS {
        let truncated = sqlx::query(&format!(
            "UPDATE users SET {column} = date({column}) \
             WHERE {column} IS NOT NULL AND date({column}) IS NOT NULL \
               AND date({column}) <> {column}"
        ))
        .execute(pool)
        .await?
        .rows_affected();

        let cleared = sqlx::query(&format!(
            "UPDATE users SET {column} = NULL \
             WHERE {column} IS NOT NULL AND date({column}) IS NULL"
        ))
        .execute(pool)
        .await?
        .rows_affected();

        if truncated > 0 || cleared > 0 {
            tracing::warn!(column, truncated, cleared, "Normalized unreadable dates in users table");
        }
    }

    Ok(())
}

/// Names of the columns currently present on the `users` table.
pub async fn user_columns(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info('users')")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}
