//! Discord gateway glue (serenity).
//!
//! Translates gateway events into dispatch calls and renders the resulting
//! payloads as embeds. No business rules live here.

pub mod commands;
pub mod handler;
pub mod render;

use serenity::all::GatewayIntents;
use serenity::Client;

use crate::state::AppContext;

pub use handler::Handler;

/// Intents needed for slash commands and member join events.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS
}

/// Build the gateway client with the SIGMA event handler attached.
pub async fn build_client(app: AppContext) -> Result<Client, serenity::Error> {
    let token = app.config.discord_token.clone();
    Client::builder(token, intents())
        .event_handler(Handler::new(app))
        .await
}
