use serenity::all::{
    ChannelId, CommandInteraction, Context, EventHandler, GuildId, Interaction, Member, Mentionable,
    Ready, User,
};
use serenity::async_trait;
use sigma_core::reply::{self, ReplyPayload, UserDisplay};
use sigma_core::types::user_id_from_snowflake;

use crate::discord::{commands, render};
use crate::dispatch::{self, CommandInvocation, MemberJoin};
use crate::state::AppContext;

/// Serenity event handler holding the application context.
pub struct Handler {
    app: AppContext,
}

impl Handler {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    async fn reply_to_command(&self, command: &CommandInteraction) -> ReplyPayload {
        let user_id = match user_id_from_snowflake(command.user.id.get()) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Cannot map Discord user id");
                return reply::failure_reply();
            }
        };

        let invocation = CommandInvocation {
            name: command.data.name.clone(),
            user_id,
            display: user_display(&command.user),
            today: self.app.config.today(),
        };

        dispatch::handle_command(&self.app, &invocation).await
    }

    /// Channel for welcome cards: the configured one, else the guild's
    /// system channel.
    async fn welcome_channel(&self, ctx: &Context, guild_id: GuildId) -> Option<ChannelId> {
        if let Some(id) = self.app.config.welcome_channel_id {
            return Some(ChannelId::new(id));
        }

        let cached = ctx.cache.guild(guild_id).map(|g| g.system_channel_id);
        if let Some(channel) = cached {
            return channel;
        }

        match guild_id.to_partial_guild(&ctx.http).await {
            Ok(guild) => guild.system_channel_id,
            Err(why) => {
                tracing::warn!(error = %why, guild_id = %guild_id, "Failed to fetch guild");
                None
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, guilds = ready.guilds.len(), "SIGMA connected");
        commands::register(&ctx, self.app.config.guild_id).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let payload = self.reply_to_command(&command).await;
        if let Err(why) = command
            .create_response(&ctx.http, render::interaction_response(&payload))
            .await
        {
            tracing::error!(
                error = %why,
                command = %command.data.name,
                "Failed to respond to slash command",
            );
        }
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        let user_id = match user_id_from_snowflake(new_member.user.id.get()) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Cannot map Discord user id");
                return;
            }
        };

        let observed_on = new_member
            .joined_at
            .and_then(|t| chrono::DateTime::from_timestamp(t.unix_timestamp(), 0))
            .map(|t| self.app.config.date_of(t))
            .unwrap_or_else(|| self.app.config.today());

        let join = MemberJoin {
            user_id,
            is_bot: new_member.user.bot,
            display: user_display(&new_member.user),
            observed_on,
        };

        let payload = match dispatch::handle_member_join(&self.app, &join).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id,
                    guild_id = %new_member.guild_id,
                    "Failed to record member join",
                );
                return;
            }
        };

        let Some(channel) = self.welcome_channel(&ctx, new_member.guild_id).await else {
            tracing::debug!(guild_id = %new_member.guild_id, "No welcome channel, skipping");
            return;
        };

        if let Err(why) = channel
            .send_message(&ctx.http, render::channel_message(&payload))
            .await
        {
            tracing::error!(error = %why, channel_id = %channel, "Failed to send welcome card");
        }
    }
}

fn user_display(user: &User) -> UserDisplay {
    UserDisplay {
        mention: user.mention().to_string(),
        name: user.tag(),
        avatar_url: Some(user.face()),
    }
}
