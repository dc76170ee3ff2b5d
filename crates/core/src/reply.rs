//! Platform-neutral reply payloads.
//!
//! Each core operation maps its result to a [`ReplyPayload`] here; turning a
//! payload into the chat platform's native message format is the gateway
//! layer's job.

use serde::Serialize;

use crate::attendance::CheckInOutcome;
use crate::types::{Amount, CalendarDate};
use crate::user::UserRecord;

/// Title used on the profile card.
pub const PROFILE_TITLE: &str = "SIGMA PROFILE";

/// Shown in place of a missing last check-in date.
pub const NO_CHECKIN_LABEL: &str = "none";

/// Shown in place of a missing join date.
pub const UNKNOWN_JOIN_LABEL: &str = "unknown";

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// A single label/value pair displayed in a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyField {
    pub label: String,
    pub value: String,
    /// Hint that the field may share a row with its neighbours.
    pub inline: bool,
}

/// Author line shown at the top of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Structured reply handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplyPayload {
    /// Plain text sent outside of any card.
    pub content: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<ReplyField>,
    pub thumbnail_url: Option<String>,
    pub author: Option<ReplyAuthor>,
    /// Only visible to the invoking user.
    pub ephemeral: bool,
}

impl ReplyPayload {
    /// A plain text reply without a card.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A card reply with a title and description.
    pub fn card(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(ReplyField {
            label: label.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail_url = url;
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(ReplyAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Look up a field value by label.
    pub fn field_value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// How the acting user is shown: mention text, display name and avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDisplay {
    pub mention: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format an amount with thousands separators and the currency sign,
/// e.g. `100000` -> `100,000₩`.
pub fn format_amount(amount: Amount) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped}₩")
}

fn format_count(count: i64) -> String {
    if count == 1 {
        "1 time".to_string()
    } else {
        format!("{count} times")
    }
}

fn format_date(date: Option<CalendarDate>, missing: &str) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| missing.to_string())
}

// ---------------------------------------------------------------------------
// Reply builders
// ---------------------------------------------------------------------------

/// Reply for a check-in attempt.
///
/// Rejections are ephemeral so repeated attempts do not spam the channel.
pub fn check_in_reply(outcome: &CheckInOutcome, user: &UserDisplay) -> ReplyPayload {
    match *outcome {
        CheckInOutcome::Granted {
            balance,
            total_checkins,
            reward,
        } => ReplyPayload::card(
            "✅ Check-in complete!",
            format!("**{}** has been granted.", format_amount(reward)),
        )
        .field("Balance", format_amount(balance), true)
        .field("Total check-ins", format_count(total_checkins), true)
        .thumbnail(user.avatar_url.clone()),
        CheckInOutcome::AlreadyCheckedIn { balance, .. } => ReplyPayload::card(
            "✅ Already checked in",
            "You already claimed today's check-in reward.",
        )
        .field("Balance", format_amount(balance), true)
        .thumbnail(user.avatar_url.clone())
        .ephemeral(),
    }
}

/// Profile card for a user record.
pub fn profile_reply(record: &UserRecord, user: &UserDisplay) -> ReplyPayload {
    ReplyPayload::card(PROFILE_TITLE, "Play games with the SIGMA bot.")
        .field("💰 Balance", format!("**{}**", format_amount(record.balance)), false)
        .field("📅 Total check-ins", format_count(record.total_checkins), true)
        .field(
            "🕒 Last check-in",
            format_date(record.last_checkin, NO_CHECKIN_LABEL),
            true,
        )
        .field(
            "📥 Joined",
            format_date(record.joined_at, UNKNOWN_JOIN_LABEL),
            true,
        )
        .thumbnail(user.avatar_url.clone())
        .author(user.name.clone(), user.avatar_url.clone())
}

/// Welcome card posted when a member joins.
///
/// `observed` is shown only if the record somehow has no join date.
pub fn welcome_reply(
    record: &UserRecord,
    user: &UserDisplay,
    observed: Option<CalendarDate>,
) -> ReplyPayload {
    let joined = format_date(record.joined_at.or(observed), UNKNOWN_JOIN_LABEL);

    ReplyPayload::card(
        "👋 New member!",
        format!(
            "Welcome, {}!\nYour SIGMA profile has been created.",
            user.mention
        ),
    )
    .author(user.name.clone(), user.avatar_url.clone())
    .thumbnail(user.avatar_url.clone())
    .field("🆔 USER ID", record.user_id.to_string(), false)
    .field("📅 Joined", joined, true)
    .field("💰 Balance", format_amount(record.balance), true)
    .field("✅ Total check-ins", format_count(record.total_checkins), true)
}

/// Liveness reply for the `ping` command.
pub fn ping_reply() -> ReplyPayload {
    ReplyPayload::text("pong 🗿")
}

/// Generic reply shown when an operation failed for internal reasons.
pub fn failure_reply() -> ReplyPayload {
    ReplyPayload::card(
        "⚠️ Something went wrong",
        "The request could not be completed. Please try again shortly.",
    )
    .ephemeral()
}

/// Informational reply for a command name the bot does not handle.
pub fn unknown_command_reply(name: &str) -> ReplyPayload {
    ReplyPayload::text(format!("Unknown command `{name}`.")).ephemeral()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
