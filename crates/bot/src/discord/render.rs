//! Render [`ReplyPayload`]s as Discord messages.

use serenity::all::{
    CreateEmbed, CreateEmbedAuthor, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage,
};
use sigma_core::reply::ReplyPayload;

/// Build the embed for a payload, or `None` for plain text replies.
pub fn embed(reply: &ReplyPayload) -> Option<CreateEmbed> {
    if reply.title.is_none() && reply.description.is_none() && reply.fields.is_empty() {
        return None;
    }

    let mut embed = CreateEmbed::new();
    if let Some(title) = &reply.title {
        embed = embed.title(title);
    }
    if let Some(description) = &reply.description {
        embed = embed.description(description);
    }
    for field in &reply.fields {
        embed = embed.field(&field.label, &field.value, field.inline);
    }
    if let Some(url) = &reply.thumbnail_url {
        embed = embed.thumbnail(url);
    }
    if let Some(author) = &reply.author {
        let mut line = CreateEmbedAuthor::new(&author.name);
        if let Some(icon) = &author.icon_url {
            line = line.icon_url(icon);
        }
        embed = embed.author(line);
    }
    Some(embed)
}

/// Response to a slash command interaction.
pub fn interaction_response(reply: &ReplyPayload) -> CreateInteractionResponse {
    let mut message = CreateInteractionResponseMessage::new().ephemeral(reply.ephemeral);
    if let Some(content) = &reply.content {
        message = message.content(content);
    }
    if let Some(embed) = embed(reply) {
        message = message.embed(embed);
    }
    CreateInteractionResponse::Message(message)
}

/// Message posted to a channel (welcome cards). Ephemerality does not apply.
pub fn channel_message(reply: &ReplyPayload) -> CreateMessage {
    let mut message = CreateMessage::new();
    if let Some(content) = &reply.content {
        message = message.content(content);
    }
    if let Some(embed) = embed(reply) {
        message = message.embed(embed);
    }
    message
}
