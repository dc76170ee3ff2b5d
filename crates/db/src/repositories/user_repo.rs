//! Repository for the `users` table.
//!
//! Provides lazy record creation, partial updates, and the two guarded
//! transitions (daily check-in, first join date) that mutate a record.

use sigma_core::attendance::{self, CheckInOutcome};
use sigma_core::join::{self, JoinStamp};
use sigma_core::types::{Amount, CalendarDate, UserId};
use sigma_core::user::UserRecord;
use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::models::user::{UpdateUser, UserRow};

/// Column list for `users` queries.
const COLUMNS: &str = "user_id, balance, total_checkins, last_checkin, joined_at";

/// Read/evaluate/write cycles a check-in may lose to concurrent writers
/// before giving up.
const MAX_CHECK_IN_ATTEMPTS: u32 = 3;

/// Provides data access for user records.
pub struct UserRepo;

impl UserRepo {
    /// Find a user record without creating it.
    pub async fn find_by_id(
        pool: &SqlitePool,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = ?");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(UserRecord::from))
    }

    /// Return the user's record, inserting a zeroed one if absent.
    ///
    /// Uses `INSERT OR IGNORE`, so concurrent calls for the same id never
    /// fail and never reset an existing row.
    pub async fn get_or_create(
        pool: &SqlitePool,
        user_id: UserId,
    ) -> Result<UserRecord, StorageError> {
        let inserted = sqlx::query("INSERT OR IGNORE INTO users (user_id) VALUES (?)")
            .bind(user_id)
            .execute(pool)
            .await?
            .rows_affected();

        if inserted > 0 {
            tracing::info!(user_id, "Created user record");
        }

        Self::find_by_id(pool, user_id)
            .await?
            .ok_or(StorageError::NotFound { user_id })
    }

    /// Fetch a fully-populated record, creating it transparently.
    ///
    /// This is the entry point command handlers use to read a user.
    pub async fn get_user(pool: &SqlitePool, user_id: UserId) -> Result<UserRecord, StorageError> {
        let record = Self::get_or_create(pool, user_id).await?;
        tracing::debug!(
            user_id,
            balance = record.balance,
            total_checkins = record.total_checkins,
            "Loaded user record",
        );
        Ok(record)
    }

    /// Apply a partial update and return the updated record.
    ///
    /// Fails with [`StorageError::NotFound`] if the row does not exist.
    pub async fn update(
        pool: &SqlitePool,
        user_id: UserId,
        dto: &UpdateUser,
    ) -> Result<UserRecord, StorageError> {
        let query = format!(
            "UPDATE users SET \
                 balance = COALESCE(?, balance), \
                 total_checkins = COALESCE(?, total_checkins), \
                 last_checkin = COALESCE(?, last_checkin), \
                 joined_at = COALESCE(joined_at, ?) \
             WHERE user_id = ? \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(dto.balance)
            .bind(dto.total_checkins)
            .bind(dto.last_checkin)
            .bind(dto.joined_at)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        row.map(UserRecord::from)
            .ok_or(StorageError::NotFound { user_id })
    }

    /// Run the daily check-in transition for `user_id` on `today`.
    ///
    /// The grant is written with a compare-and-set on the values that were
    /// read. If a concurrent writer changed the row in between, the record is
    /// re-read and the rule re-evaluated, so two simultaneous check-ins on the
    /// same day grant exactly once.
    pub async fn check_in(
        pool: &SqlitePool,
        user_id: UserId,
        today: CalendarDate,
        reward: Amount,
    ) -> Result<CheckInOutcome, StorageError> {
        for attempt in 1..=MAX_CHECK_IN_ATTEMPTS {
            let record = Self::get_or_create(pool, user_id).await?;
            let outcome = attendance::evaluate(&record, today, reward)?;

            let CheckInOutcome::Granted {
                balance,
                total_checkins,
                ..
            } = outcome
            else {
                tracing::debug!(user_id, %today, "Check-in rejected, already checked in today");
                return Ok(outcome);
            };

            let applied = sqlx::query(
                "UPDATE users SET balance = ?, total_checkins = ?, last_checkin = ? \
                 WHERE user_id = ? AND balance = ? AND total_checkins = ? AND last_checkin IS ?",
            )
            .bind(balance)
            .bind(total_checkins)
            .bind(today)
            .bind(user_id)
            .bind(record.balance)
            .bind(record.total_checkins)
            .bind(record.last_checkin)
            .execute(pool)
            .await?
            .rows_affected();

            if applied == 1 {
                tracing::info!(user_id, %today, balance, total_checkins, "Check-in granted");
                return Ok(outcome);
            }

            tracing::warn!(user_id, attempt, "Check-in raced a concurrent update, re-evaluating");
        }

        Err(StorageError::Contention {
            user_id,
            attempts: MAX_CHECK_IN_ATTEMPTS,
        })
    }

    /// Record a join observation and return the persisted record.
    ///
    /// `joined_at` is stamped only when empty; otherwise `observed` is
    /// discarded. The returned record is re-read after the write so callers
    /// display the stored date, not the input.
    pub async fn record_join(
        pool: &SqlitePool,
        user_id: UserId,
        observed: CalendarDate,
    ) -> Result<UserRecord, StorageError> {
        let record = Self::get_or_create(pool, user_id).await?;

        match join::resolve(record.joined_at, observed) {
            JoinStamp::Keep(existing) => {
                tracing::debug!(user_id, %existing, %observed, "Join date already recorded");
                Ok(record)
            }
            JoinStamp::Stamp(date) => {
                sqlx::query("UPDATE users SET joined_at = ? WHERE user_id = ? AND joined_at IS NULL")
                    .bind(date)
                    .bind(user_id)
                    .execute(pool)
                    .await?;
                tracing::info!(user_id, joined_at = %date, "Recorded join date");

                Self::find_by_id(pool, user_id)
                    .await?
                    .ok_or(StorageError::NotFound { user_id })
            }
        }
    }
}
