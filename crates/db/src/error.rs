use sigma_core::error::CoreError;
use sigma_core::types::UserId;

/// Failure of a store operation.
///
/// Every variant means the operation was aborted with no partial write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database was unreachable, corrupt, or timed out.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User record {user_id} not found")]
    NotFound { user_id: UserId },

    /// Every check-in attempt lost a race against a concurrent writer.
    #[error("Check-in for user {user_id} abandoned after {attempts} contended attempts")]
    Contention { user_id: UserId, attempts: u32 },

    /// The domain rule refused the transition (e.g. balance overflow).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StorageError {
    /// Whether the failure was a bounded wait running out: either no pool
    /// connection became free, or SQLite stayed busy past its busy timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::PoolTimedOut) => true,
            // SQLITE_BUSY and its extended codes.
            StorageError::Database(sqlx::Error::Database(db_err)) => {
                matches!(db_err.code().as_deref(), Some("5" | "261" | "517"))
            }
            _ => false,
        }
    }
}
