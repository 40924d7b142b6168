//! The responder's view of the chat platform.

use serenity::async_trait;

use crate::common::error::DiscordResult;

/// A message received from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Username of the author.
    pub author_name: String,
    pub content: String,
    /// Channel the message was posted in; replies default to it.
    pub channel_id: u64,
}

/// Outbound capability of the chat client.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `text` to `target`, returning the content that was sent.
    async fn send_message(&self, target: u64, text: &str) -> DiscordResult<String>;
}
