use crate::config::TelegramConfig;
use crate::plugins::traits::{NotificationResult, NotifierPlugin, Update, UpdateSource};
use crate::utils::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Extra time granted to the HTTP request on top of the long-poll hint.
const POLL_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram Bot API client: sends messages to the configured chat and reads
/// pending updates for the command poller.
pub struct TelegramNotifier {
    client: Client,
    api_base_url: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
    send_timeout: Duration,
    poll_timeout: u64,
}

impl TelegramNotifier {
    pub fn from_config(config: &TelegramConfig) -> Result<Self, AppError> {
        let client = Client::builder().build()?;

        if config.bot_token.is_none() || config.chat_id.is_none() {
            tracing::warn!("Telegram token or chat id not configured, notifications are disabled");
        }

        Ok(TelegramNotifier {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            send_timeout: Duration::from_secs(config.send_timeout),
            poll_timeout: config.poll_timeout,
        })
    }

    pub fn authorized_chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, token, method)
    }

    fn create_message_payload(chat_id: &str, message: &str) -> serde_json::Value {
        json!({
            "chat_id": chat_id,
            "text": message,
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        })
    }

    async fn request_updates(&self, token: &str, offset: i64) -> Result<Vec<Update>, AppError> {
        let response = self
            .client
            .get(self.method_url(token, "getUpdates"))
            .query(&[
                ("offset", (offset + 1).to_string()),
                ("timeout", self.poll_timeout.to_string()),
            ])
            .timeout(Duration::from_secs(self.poll_timeout) + POLL_GRACE)
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<Vec<Update>> = response.json().await?;
        if !body.ok {
            return Err(AppError::Notify(
                body.description
                    .unwrap_or_else(|| "getUpdates returned ok=false".to_string()),
            ));
        }

        Ok(body.result.unwrap_or_default())
    }
}

#[async_trait]
impl NotifierPlugin for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    async fn notify(&self, message: &str) -> Result<NotificationResult, AppError> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            tracing::warn!("Telegram token or chat id not configured, message not sent");
            return Ok(NotificationResult::skipped("Telegram credentials not configured"));
        };

        let response = self
            .client
            .post(self.method_url(token, "sendMessage"))
            .timeout(self.send_timeout)
            .json(&Self::create_message_payload(chat_id, message))
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<SentMessage> = response.json().await?;
        if !body.ok {
            return Err(AppError::Notify(
                body.description
                    .unwrap_or_else(|| "sendMessage returned ok=false".to_string()),
            ));
        }

        tracing::info!("Telegram message sent");
        Ok(NotificationResult::sent(
            body.result.map(|sent| sent.message_id.to_string()),
        ))
    }
}

#[async_trait]
impl UpdateSource for TelegramNotifier {
    async fn fetch_updates(&self, offset: i64) -> Vec<Update> {
        let Some(token) = &self.bot_token else {
            tracing::warn!("Telegram token not configured, no updates fetched");
            return Vec::new();
        };

        match self.request_updates(token, offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::error!("Failed to fetch Telegram updates: {}", e);
                Vec::new()
            }
        }
    }
}
