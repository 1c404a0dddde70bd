use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(reason.into()),
        }
    }
}

/// Trait for implementing notification channels (Telegram, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &'static str;

    /// Whether the channel has the credentials it needs to deliver anything.
    fn is_configured(&self) -> bool;

    /// Deliver a pre-formatted message. An unconfigured notifier returns a
    /// skipped result instead of an error.
    async fn notify(&self, message: &str) -> Result<NotificationResult, AppError>;
}
