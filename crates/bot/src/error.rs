use crate::config::ConfigError;

/// Top-level error for startup and gateway glue.
///
/// Command handlers never return this; they convert store failures into a
/// user-visible failure reply instead.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Missing or malformed configuration. Fatal at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A database error outside of a repository call (connect, migrate).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The Discord client failed to build or lost its gateway connection.
    #[error("Discord client error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
