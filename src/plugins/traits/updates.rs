use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

/// Inbound update envelope. Only updates carrying a message are interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

impl Update {
    pub fn text_message(update_id: i64, chat_id: i64, text: &str) -> Self {
        Self {
            update_id,
            message: Some(IncomingMessage {
                chat: Chat { id: chat_id },
                text: Some(text.to_string()),
            }),
        }
    }
}

/// Source of inbound chat updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Updates with an identifier strictly greater than `offset`.
    ///
    /// Transport and API failures are logged and reported as no updates.
    async fn fetch_updates(&self, offset: i64) -> Vec<Update>;
}
