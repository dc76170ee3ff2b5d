//! The per-user record: balance, attendance counters and join metadata.

use serde::Serialize;

use crate::types::{Amount, CalendarDate, UserId};

/// A fully-populated user record as persisted in the `users` table.
///
/// Records are created lazily with zeroed counters and no dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub balance: Amount,
    pub total_checkins: i64,
    /// `None` means the user has never checked in.
    pub last_checkin: Option<CalendarDate>,
    /// Set once, on first observation of the user, and never overwritten.
    pub joined_at: Option<CalendarDate>,
}

impl UserRecord {
    /// A freshly created record for a never-seen user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: 0,
            total_checkins: 0,
            last_checkin: None,
            joined_at: None,
        }
    }

    /// Whether the user already claimed the reward on `today`.
    pub fn checked_in_on(&self, today: CalendarDate) -> bool {
        self.last_checkin == Some(today)
    }
}
