use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use sigma_core::attendance::{self, DEFAULT_DAILY_REWARD};
use sigma_core::types::{Amount, CalendarDate};

/// Configuration problems detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Bot configuration loaded from environment variables.
///
/// Only the Discord token is required; everything else has a default
/// suitable for a single-server deployment.
#[derive(Clone)]
pub struct BotConfig {
    /// Discord bot token.
    pub discord_token: String,
    /// SQLite database URL.
    pub database_url: String,
    /// Reward granted per successful daily check-in.
    pub daily_reward: Amount,
    /// Channel that receives welcome cards. Falls back to the guild's
    /// system channel when unset.
    pub welcome_channel_id: Option<u64>,
    /// Register slash commands on this guild only (instant propagation)
    /// instead of globally.
    pub guild_id: Option<u64>,
    /// Fixed timezone in which "today" is evaluated for check-ins.
    pub utc_offset: FixedOffset,
    /// Upper bound for waiting on the database, in seconds.
    pub db_timeout_secs: u64,
    /// Liveness server bind address.
    pub host: IpAddr,
    /// Liveness server bind port.
    pub port: u16,
    /// Liveness request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default             |
    /// |----------------------------|---------------------|
    /// | `DISCORD_TOKEN`            | required            |
    /// | `DATABASE_URL`             | `sqlite://sigma.db` |
    /// | `DAILY_REWARD`             | `100000`            |
    /// | `WELCOME_CHANNEL_ID`       | unset (`0` = unset) |
    /// | `GUILD_ID`                 | unset               |
    /// | `CHECKIN_UTC_OFFSET_HOURS` | `0`                 |
    /// | `DB_TIMEOUT_SECS`          | `5`                 |
    /// | `HOST`                     | `0.0.0.0`           |
    /// | `PORT`                     | `10000`             |
    /// | `REQUEST_TIMEOUT_SECS`     | `10`                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://sigma.db".to_string());

        let daily_reward: Amount = parse_or(&lookup, "DAILY_REWARD", DEFAULT_DAILY_REWARD)?;
        attendance::validate_reward(daily_reward).map_err(|e| ConfigError::Invalid {
            key: "DAILY_REWARD",
            value: daily_reward.to_string(),
            reason: e.to_string(),
        })?;

        let welcome_channel_id = parse_snowflake(&lookup, "WELCOME_CHANNEL_ID")?;
        let guild_id = parse_snowflake(&lookup, "GUILD_ID")?;

        let offset_hours: i32 = parse_or(&lookup, "CHECKIN_UTC_OFFSET_HOURS", 0)?;
        let utc_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "CHECKIN_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
                reason: "offset must be between -23 and 23 hours".to_string(),
            })?;

        let db_timeout_secs: u64 = parse_or(&lookup, "DB_TIMEOUT_SECS", 5)?;
        let host: IpAddr = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_or(&lookup, "PORT", 10000)?;
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            discord_token,
            database_url,
            daily_reward,
            welcome_channel_id,
            guild_id,
            utc_offset,
            db_timeout_secs,
            host,
            port,
            request_timeout_secs,
        })
    }

    /// The calendar date of `instant` in the configured check-in timezone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> CalendarDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// Today's date in the configured check-in timezone.
    pub fn today(&self) -> CalendarDate {
        self.date_of(Utc::now())
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("discord_token", &"<redacted>")
            .field("database_url", &self.database_url)
            .field("daily_reward", &self.daily_reward)
            .field("welcome_channel_id", &self.welcome_channel_id)
            .field("guild_id", &self.guild_id)
            .field("utc_offset", &self.utc_offset)
            .field("db_timeout_secs", &self.db_timeout_secs)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Parse `key` if present, otherwise return `default`.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Parse an optional Discord id. Empty and `0` both mean "unset".
fn parse_snowflake<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            let id: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            Ok((id != 0).then_some(id))
        }
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
