//! Daily check-in rule: at most one reward grant per user per calendar day.
//!
//! [`evaluate`] is the whole state transition. It never touches storage; the
//! store layer persists the new values of a [`CheckInOutcome::Granted`]
//! result as a single guarded update.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Amount, CalendarDate};
use crate::user::UserRecord;

/// Reward granted per successful check-in unless configured otherwise.
pub const DEFAULT_DAILY_REWARD: Amount = 100_000;

/// Result of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// The reward was granted; values are the state after the grant.
    Granted {
        balance: Amount,
        total_checkins: i64,
        reward: Amount,
    },
    /// The user already checked in today; values are unchanged.
    AlreadyCheckedIn { balance: Amount, total_checkins: i64 },
}

impl CheckInOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, CheckInOutcome::Granted { .. })
    }

    pub fn balance(&self) -> Amount {
        match *self {
            CheckInOutcome::Granted { balance, .. } => balance,
            CheckInOutcome::AlreadyCheckedIn { balance, .. } => balance,
        }
    }

    pub fn total_checkins(&self) -> i64 {
        match *self {
            CheckInOutcome::Granted { total_checkins, .. } => total_checkins,
            CheckInOutcome::AlreadyCheckedIn { total_checkins, .. } => total_checkins,
        }
    }
}

/// Validate that a configured reward is strictly positive.
pub fn validate_reward(reward: Amount) -> Result<(), CoreError> {
    if reward <= 0 {
        return Err(CoreError::Validation(format!(
            "Daily reward must be positive, got {reward}"
        )));
    }
    Ok(())
}

/// Decide the check-in transition for `record` on `today`.
///
/// Comparison is by calendar date only: any attempt on the same date as
/// `last_checkin` is rejected regardless of time of day.
pub fn evaluate(
    record: &UserRecord,
    today: CalendarDate,
    reward: Amount,
) -> Result<CheckInOutcome, CoreError> {
    if record.checked_in_on(today) {
        return Ok(CheckInOutcome::AlreadyCheckedIn {
            balance: record.balance,
            total_checkins: record.total_checkins,
        });
    }

    validate_reward(reward)?;

    let balance = record
        .balance
        .checked_add(reward)
        .ok_or(CoreError::BalanceOverflow {
            balance: record.balance,
            reward,
        })?;

    Ok(CheckInOutcome::Granted {
        balance,
        total_checkins: record.total_checkins + 1,
        reward,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
