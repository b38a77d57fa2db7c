//! Outbound chat messages.

use crate::error::Result;
use crate::presenter::ProductCard;
use async_trait::async_trait;

/// Chat identifier as used by the Bot API.
pub type ChatId = i64;

/// Sends replies to a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain-text message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Send one product card with its link button.
    async fn send_card(&self, chat_id: ChatId, card: &ProductCard) -> Result<()>;
}
