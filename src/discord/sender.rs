//! Outbound messages over the serenity HTTP client.

use std::sync::Arc;

use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use tokio::sync::RwLock;

use crate::common::error::{DiscordError, DiscordResult};
use crate::responder::ChatClient;

/// Sends messages once a gateway session has handed us its HTTP client.
#[derive(Default)]
pub struct DiscordSender {
    http: RwLock<Option<Arc<Http>>>,
}

impl DiscordSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the HTTP client of a freshly connected session.
    pub async fn attach(&self, http: Arc<Http>) {
        *self.http.write().await = Some(http);
    }

    /// Forget the HTTP client after a disconnect.
    pub async fn detach(&self) {
        *self.http.write().await = None;
    }
}

#[async_trait]
impl ChatClient for DiscordSender {
    async fn send_message(&self, target: u64, text: &str) -> DiscordResult<String> {
        let http = self
            .http
            .read()
            .await
            .clone()
            .ok_or(DiscordError::NotConnected)?;

        if target == 0 {
            return Err(DiscordError::SendFailed {
                target,
                message: "channel id must be non-zero".to_string(),
            });
        }

        let sent = ChannelId::new(target).say(&http, text).await?;
        Ok(sent.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_before_ready_fails() {
        let sender = DiscordSender::new();

        let result = tokio_test::block_on(sender.send_message(1234, "hello"));
        assert!(matches!(result, Err(DiscordError::NotConnected)));
    }

    #[tokio::test]
    async fn test_send_to_zero_channel_fails() {
        let sender = DiscordSender::new();
        sender.attach(Arc::new(Http::new("token"))).await;

        let result = sender.send_message(0, "hello").await;
        assert!(matches!(result, Err(DiscordError::SendFailed { target: 0, .. })));

        sender.detach().await;
        let result = sender.send_message(1234, "hello").await;
        assert!(matches!(result, Err(DiscordError::NotConnected)));
    }
}
