//! User row model and DTOs.

use sigma_core::types::{Amount, CalendarDate, UserId};
use sigma_core::user::UserRecord;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub balance: Amount,
    pub total_checkins: i64,
    pub last_checkin: Option<CalendarDate>,
    pub joined_at: Option<CalendarDate>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            user_id: row.user_id,
            balance: row.balance,
            total_checkins: row.total_checkins,
            last_checkin: row.last_checkin,
            joined_at: row.joined_at,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Partial update for a user row. `None` fields are left unchanged.
///
/// `joined_at` only fills an empty join date; an existing one is kept.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub balance: Option<Amount>,
    pub total_checkins: Option<i64>,
    pub last_checkin: Option<CalendarDate>,
    pub joined_at: Option<CalendarDate>,
}
