//! Slash command registration.

use serenity::all::{Command, Context, CreateCommand, GuildId};

use crate::dispatch::BotCommand;

/// Command definitions sent to Discord.
pub fn definitions() -> Vec<CreateCommand> {
    BotCommand::ALL
        .into_iter()
        .map(|c| CreateCommand::new(c.name()).description(c.description()))
        .collect()
}

/// Register the slash commands, guild-scoped when `guild_id` is set.
///
/// Failure is logged and otherwise ignored: the bot keeps serving any
/// commands that were registered previously.
pub async fn register(ctx: &Context, guild_id: Option<u64>) {
    let commands = definitions();

    let result = match guild_id {
        Some(id) => GuildId::new(id).set_commands(&ctx.http, commands).await,
        None => Command::set_global_commands(&ctx.http, commands).await,
    };

    match result {
        Ok(registered) => tracing::info!(
            count = registered.len(),
            guild_id = ?guild_id,
            "Registered slash commands",
        ),
        Err(why) => tracing::error!(error = %why, "Failed to register slash commands"),
    }
}
