use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Messenger port used to deliver notifications.
///
/// Implementations report any failed send as `Error::Delivery`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}

/// Deliver `text` to `chat_id`, tracing the attempt.
pub async fn notify(notifier: &dyn Notifier, chat_id: ChatId, text: &str) -> Result<()> {
    tracing::debug!(chat_id = chat_id.0, "sending telegram message");
    notifier.send_text(chat_id, text).await?;
    tracing::debug!(text, "message delivered");
    Ok(())
}
