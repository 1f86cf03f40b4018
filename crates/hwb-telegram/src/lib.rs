//! Telegram adapter (teloxide).
//!
//! This crate implements the `hwb-core` Notifier port over Telegram Bot API.

use async_trait::async_trait;

use teloxide::prelude::*;

use hwb_core::{domain::ChatId, errors::Error, messaging::port::Notifier, Result};

#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    /// Username of the bot, if Telegram answers `getMe`.
    pub async fn username(&self) -> Option<String> {
        match self.bot.get_me().await {
            Ok(me) => Some(me.username().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "telegram getMe failed");
                None
            }
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        // Plain text: verdicts are sent without parse mode.
        self.bot
            .send_message(Self::tg_chat(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::ApiError;

    #[test]
    fn chat_id_maps_verbatim() {
        assert_eq!(
            TelegramNotifier::tg_chat(ChatId(-1001234567890)),
            teloxide::types::ChatId(-1001234567890)
        );
    }

    #[test]
    fn request_errors_become_delivery_errors() {
        let err = TelegramNotifier::map_err(teloxide::RequestError::Api(ApiError::BotBlocked));
        match err {
            Error::Delivery(msg) => assert!(msg.starts_with("telegram error: ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
