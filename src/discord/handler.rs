//! Discord event handling.
//!
//! Turns gateway events into responder calls.

use std::sync::Arc;

use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{debug, info};

use crate::discord::sender::DiscordSender;
use crate::responder::{Dispatch, IncomingMessage, Responder};

/// Feeds Discord events into the responder, one at a time.
pub struct ResponderHandler {
    responder: Arc<Responder>,
    sender: Arc<DiscordSender>,
}

impl ResponderHandler {
    pub fn new(responder: Arc<Responder>, sender: Arc<DiscordSender>) -> Self {
        Self { responder, sender }
    }

    pub async fn handle_ready(&self, context: Context, ready: Ready) {
        self.sender.attach(context.http.clone()).await;
        self.responder.on_ready(&ready.user.name);
    }

    pub fn handle_message(&self, message: Message) {
        match self.responder.on_message(incoming_from(&message)) {
            Dispatch::Scheduled(reply) => {
                debug!("Reply to message {} scheduled (done: {})", message.id, reply.is_finished());
            }
            Dispatch::Suppressed => debug!("Reply to message {} suppressed", message.id),
            Dispatch::Ignored | Dispatch::NoMatch => {}
        }
    }

    pub async fn handle_disconnect(&self) {
        info!("Discord session lost; replies will fail until reconnected");
        self.sender.detach().await;
    }
}

/// Convert a serenity message into the responder's message type.
fn incoming_from(message: &Message) -> IncomingMessage {
    IncomingMessage {
        author_name: message.author.name.clone(),
        content: message.content.clone(),
        channel_id: message.channel_id.get(),
    }
}
