//! Text message delivery.

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> AppResult<()>;
}

/// Writes each message to the log instead of a carrier.
pub struct LoggingSmsSender {
    sender_id: String,
}

impl LoggingSmsSender {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
        }
    }
}

#[async_trait]
impl SmsSender for LoggingSmsSender {
    async fn send(&self, phone: &str, message: &str) -> AppResult<()> {
        tracing::info!(
            sender = %self.sender_id,
            to = %phone,
            length = message.len(),
            "SMS dispatched"
        );
        tracing::debug!(to = %phone, body = %message, "SMS body");
        Ok(())
    }
}
