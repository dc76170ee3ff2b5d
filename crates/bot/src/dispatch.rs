//! Platform-neutral event handling.
//!
//! The gateway layer translates chat-platform events into
//! [`CommandInvocation`]s and [`MemberJoin`]s; the functions here run the
//! matching store operation and map its result to a [`ReplyPayload`].
//! Store failures stop here: they are logged and turned into a generic
//! failure reply, never propagated into the gateway loop.

use sigma_core::reply::{self, ReplyPayload, UserDisplay};
use sigma_core::types::{CalendarDate, UserId};
use sigma_db::repositories::UserRepo;
use sigma_db::StorageError;

use crate::state::AppContext;

/// Slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    CheckIn,
    Profile,
    Ping,
}

impl BotCommand {
    pub const ALL: [BotCommand; 3] = [BotCommand::CheckIn, BotCommand::Profile, BotCommand::Ping];

    /// Registered command name.
    pub fn name(self) -> &'static str {
        match self {
            BotCommand::CheckIn => "checkin",
            BotCommand::Profile => "profile",
            BotCommand::Ping => "ping",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BotCommand::CheckIn => "Claim your daily check-in reward.",
            BotCommand::Profile => "Show your SIGMA profile.",
            BotCommand::Ping => "Check that SIGMA is responding.",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// A slash command invoked by a user.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Command name as received from the platform.
    pub name: String,
    pub user_id: UserId,
    pub display: UserDisplay,
    /// Current date in the configured check-in timezone.
    pub today: CalendarDate,
}

/// A user joining the community.
#[derive(Debug, Clone)]
pub struct MemberJoin {
    pub user_id: UserId,
    pub is_bot: bool,
    pub display: UserDisplay,
    /// Join date as reported by the platform, or the date the event was
    /// observed when the platform reports none.
    pub observed_on: CalendarDate,
}

/// Handle a slash command and produce the reply to send back.
///
/// Always returns a reply: unknown commands get an informational message and
/// store failures get [`reply::failure_reply`].
pub async fn handle_command(ctx: &AppContext, invocation: &CommandInvocation) -> ReplyPayload {
    let Some(command) = BotCommand::from_name(&invocation.name) else {
        tracing::warn!(command = %invocation.name, "Unknown command received");
        return reply::unknown_command_reply(&invocation.name);
    };

    tracing::debug!(command = command.name(), user_id = invocation.user_id, "Handling command");

    match run_command(ctx, command, invocation).await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(
                error = %e,
                timed_out = e.is_timeout(),
                command = command.name(),
                user_id = invocation.user_id,
                "Command failed",
            );
            reply::failure_reply()
        }
    }
}

async fn run_command(
    ctx: &AppContext,
    command: BotCommand,
    invocation: &CommandInvocation,
) -> Result<ReplyPayload, StorageError> {
    match command {
        BotCommand::CheckIn => {
            let outcome = UserRepo::check_in(
                &ctx.pool,
                invocation.user_id,
                invocation.today,
                ctx.config.daily_reward,
            )
            .await?;
            Ok(reply::check_in_reply(&outcome, &invocation.display))
        }
        BotCommand::Profile => {
            let record = UserRepo::get_user(&ctx.pool, invocation.user_id).await?;
            Ok(reply::profile_reply(&record, &invocation.display))
        }
        BotCommand::Ping => Ok(reply::ping_reply()),
    }
}

/// Record a join and build the welcome card.
///
/// Bots are ignored and produce no reply. Store failures are returned so the
/// caller can log them against the guild; no welcome is sent in that case.
pub async fn handle_member_join(
    ctx: &AppContext,
    join: &MemberJoin,
) -> Result<Option<ReplyPayload>, StorageError> {
    if join.is_bot {
        tracing::debug!(user_id = join.user_id, "Ignoring bot join");
        return Ok(None);
    }

    let record = UserRepo::record_join(&ctx.pool, join.user_id, join.observed_on).await?;
    tracing::info!(user_id = join.user_id, joined_at = ?record.joined_at, "Member joined");

    Ok(Some(reply::welcome_reply(
        &record,
        &join.display,
        Some(join.observed_on),
    )))
}
