//! Remote control over chat: reads pending messages since the persisted
//! offset, answers recognised commands and reports whether a check was asked for.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::formatter::escape_html;
use crate::plugins::traits::{NotifierPlugin, Update, UpdateSource};
use crate::store::OffsetStore;

const CHECK_ACK: &str = "🔍 Availability check in progress...\nResults will follow in a few seconds.";

const HELP_TEXT: &str = "🤖 <b>Available commands:</b>

/check - Check product availability right now
/help - Show this message
/status - Show the monitoring status

The bot checks automatically and notifies you when something changes!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check,
    Help,
    Status,
    /// Any other text starting with `/`, as received (trimmed, lower-cased).
    Unrecognized(String),
}

impl Command {
    /// Interpret a chat message. Returns `None` for plain text.
    ///
    /// The whole message must match a command; only a trailing `@botname`
    /// is dropped, so `/Check@my_bot` is a check request but `/check now` is not.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim().to_lowercase();
        if !text.starts_with('/') {
            return None;
        }

        let command = match text.split_once('@') {
            Some((command, bot)) if !bot.is_empty() && !bot.contains(char::is_whitespace) => command,
            _ => text.as_str(),
        };

        Some(match command {
            "/check" => Command::Check,
            "/help" => Command::Help,
            "/status" => Command::Status,
            _ => Command::Unrecognized(text.clone()),
        })
    }
}

/// Values shown in the `/status` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub check_interval_minutes: u64,
    pub product_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub check_requested: bool,
    pub messages_seen: usize,
    pub previous_offset: i64,
    pub new_offset: i64,
    pub replies_sent: usize,
}

impl PollOutcome {
    /// Process exit code for a poll: 0 tells the caller to run a check, 1 that
    /// there is nothing to do.
    pub fn exit_code(&self) -> u8 {
        if self.check_requested { 0 } else { 1 }
    }
}

pub struct CommandHandler {
    source: Arc<dyn UpdateSource>,
    notifier: Arc<dyn NotifierPlugin>,
    offsets: OffsetStore,
    authorized_chat_id: Option<String>,
    status: StatusInfo,
}

impl CommandHandler {
    pub fn new(
        source: Arc<dyn UpdateSource>,
        notifier: Arc<dyn NotifierPlugin>,
        offsets: OffsetStore,
        authorized_chat_id: Option<String>,
        status: StatusInfo,
    ) -> Self {
        Self {
            source,
            notifier,
            offsets,
            authorized_chat_id,
            status,
        }
    }

    pub async fn process(&self) -> PollOutcome {
        let previous_offset = self.offsets.load();
        let mut updates = self.source.fetch_updates(previous_offset).await;

        let mut outcome = PollOutcome {
            previous_offset,
            new_offset: previous_offset,
            messages_seen: updates.len(),
            ..PollOutcome::default()
        };

        if updates.is_empty() {
            tracing::info!("No new messages");
            return outcome;
        }

        tracing::info!("Found {} new messages", updates.len());
        updates.sort_by_key(|update| update.update_id);

        for update in &updates {
            outcome.new_offset = outcome.new_offset.max(update.update_id);

            let Some(text) = self.authorized_text(update) else {
                continue;
            };
            tracing::info!("Message received: '{}'", text);

            let Some(command) = Command::parse(&text) else {
                continue;
            };

            if command == Command::Check {
                tracing::info!("/check command received");
                outcome.check_requested = true;
            }

            let reply = self.reply_for(&command, Utc::now());
            if self.send_reply(&reply).await {
                outcome.replies_sent += 1;
            }
        }

        match self.offsets.advance(outcome.new_offset) {
            Ok(true) => tracing::info!("Saved update offset: {}", outcome.new_offset),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to save update offset: {}", e),
        }

        outcome
    }

    /// Normalised text of a message from the authorised chat, if any.
    fn authorized_text(&self, update: &Update) -> Option<String> {
        let message = update.message.as_ref()?;

        let chat_id = message.chat.id.to_string();
        if self.authorized_chat_id.as_deref() != Some(chat_id.as_str()) {
            tracing::warn!("Ignoring message from unauthorized chat: {}", chat_id);
            return None;
        }

        Some(message.text.as_deref().unwrap_or_default().trim().to_lowercase())
    }

    fn reply_for(&self, command: &Command, now: DateTime<Utc>) -> String {
        match command {
            Command::Check => CHECK_ACK.to_string(),
            Command::Help => HELP_TEXT.to_string(),
            Command::Status => format!(
                "📊 <b>Bot Status</b>\n\n\
                 ✅ Bot running\n\
                 ⏰ Automatic check: every {} minutes\n\
                 📦 Monitored products: {}\n\
                 🔔 Notifications: active\n\n\
                 Last message poll: {}\n\n\
                 Use /check for an immediate check.",
                self.status.check_interval_minutes,
                self.status.product_count,
                now.format("%Y-%m-%d %H:%M:%S UTC"),
            ),
            Command::Unrecognized(text) => format!(
                "❓ Command '{}' not recognized.\n\nUse /help to see available commands.",
                escape_html(text)
            ),
        }
    }

    async fn send_reply(&self, reply: &str) -> bool {
        match self.notifier.notify(reply).await {
            Ok(result) => result.success,
            Err(e) => {
                tracing::error!("Failed to send reply: {}", e);
                false
            }
        }
    }
}
