/// Platform user identifiers are stored as SQLite INTEGER (signed 64-bit).
pub type UserId = i64;

/// Currency amounts (balance, rewards) in abstract units.
pub type Amount = i64;

/// Calendar dates carry no time component and no timezone.
pub type CalendarDate = chrono::NaiveDate;

/// Convert a platform snowflake (`u64`) into a [`UserId`].
///
/// Snowflakes above `i64::MAX` cannot be stored and are rejected.
pub fn user_id_from_snowflake(raw: u64) -> Result<UserId, crate::error::CoreError> {
    UserId::try_from(raw).map_err(|_| {
        crate::error::CoreError::Validation(format!("User id {raw} does not fit in 64-bit signed range"))
    })
}
