//! Discord bot client abstraction.
//!
//! Provides a high-level interface for creating and running the Discord bot,
//! hiding serenity implementation details from the rest of the application.

use std::sync::Arc;
use std::time::Duration;

use backon::BackoffBuilder;
use serenity::async_trait;
use serenity::http::HttpBuilder;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::discord::handler::ResponderHandler;
use crate::discord::sender::DiscordSender;
use crate::responder::Responder;

/// Longest wait between reconnection attempts.
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub enum DiscordBotEvent {
    /// Bot connected and ready.
    Ready { context: Context, ready: Ready },
    /// Message received.
    Message(Message),
    Disconnected,
}

struct DiscordBotEvents {
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
}

impl DiscordBotEvents {
    fn new(discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>) -> Self {
        Self { discord_events_tx }
    }

    fn forward(&self, event: DiscordBotEvent) {
        if let Err(error) = self.discord_events_tx.send(event) {
            warn!("Failed to process discord event: {}", error);
        }
    }
}

#[async_trait]
impl EventHandler for DiscordBotEvents {
    async fn ready(&self, context: Context, ready: Ready) {
        self.forward(DiscordBotEvent::Ready { context, ready });
    }

    async fn message(&self, _context: Context, message: Message) {
        self.forward(DiscordBotEvent::Message(message));
    }
}

/// Builds the serenity client with the gateway intents a responder needs.
///
/// Guild, member, presence and voice events are never subscribed to.
async fn build_client(
    token: &str,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
) -> anyhow::Result<Client> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    // Build a custom reqwest client with timeout settings
    let reqwest_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let events = DiscordBotEvents::new(discord_events_tx);
    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(events)
        .await?;
    Ok(client)
}

/// Create an exponential backoff iterator for Discord reconnection.
/// 5s initial, 5min max, factor 1.1, with jitter, unlimited retries.
fn discord_backoff() -> impl Iterator<Item = Duration> {
    backon::ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(5))
        .with_max_delay(MAX_RECONNECT_DELAY)
        .with_factor(1.1)
        .with_jitter()
        .without_max_times()
        .build()
}

pub struct DiscordBot {
    client: Option<Client>,
    token: String,
    handler: ResponderHandler,
    discord_events_rx: mpsc::UnboundedReceiver<DiscordBotEvent>,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
    shutdown_rx: watch::Receiver<bool>,
}

impl DiscordBot {
    /// Build the Discord bot; the connection is opened by [`DiscordBot::run`].
    pub async fn build(
        token: String,
        responder: Arc<Responder>,
        sender: Arc<DiscordSender>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> anyhow::Result<Self> {
        let (discord_events_tx, discord_events_rx) = mpsc::unbounded_channel::<DiscordBotEvent>();

        let client = build_client(&token, discord_events_tx.clone()).await?;

        Ok(Self {
            client: Some(client),
            token,
            handler: ResponderHandler::new(responder, sender),
            discord_events_rx,
            discord_events_tx,
            shutdown_rx,
        })
    }

    pub async fn run(mut self) {
        let shard_manager = self.client.as_ref().map(|c| c.shard_manager.clone());
        let client = &mut self.client;
        let discord_events_rx = &mut self.discord_events_rx;
        let handler = &self.handler;
        let mut shutdown_rx = self.shutdown_rx.clone();

        tokio::select! {
            _ = Self::run_connection(client, &self.token, &self.discord_events_tx) => {},
            _ = Self::process_events(discord_events_rx, handler, &mut self.shutdown_rx) => {},
            _ = async {
                loop {
                    if shutdown_rx.changed().await.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                if let Some(ref manager) = shard_manager {
                    info!("Initiating graceful Discord shutdown...");
                    manager.shutdown_all().await;
                    info!("Discord shutdown complete");
                }
            } => {}
        }
        info!("Discord task ended");
    }

    /// Keep a gateway session open, rebuilding the client after failures.
    async fn run_connection(
        client: &mut Option<Client>,
        token: &str,
        discord_events_tx: &mpsc::UnboundedSender<DiscordBotEvent>,
    ) {
        let mut backoff = discord_backoff();

        loop {
            let session = match client.take() {
                Some(client) => Ok(client),
                None => build_client(token, discord_events_tx.clone()).await,
            };

            let started = Instant::now();
            let result = match session {
                Ok(mut session) => {
                    info!("Connecting to Discord...");
                    session.start().await.map_err(anyhow::Error::from)
                }
                Err(e) => Err(e.context("failed to rebuild Discord client")),
            };

            if let Err(error) = discord_events_tx.send(DiscordBotEvent::Disconnected) {
                warn!("Failed to process discord event: {}", error);
            }

            if let Err(e) = result {
                // A long-lived session counts as a success.
                if started.elapsed() > MAX_RECONNECT_DELAY {
                    backoff = discord_backoff();
                }
                let delay = backoff.next().unwrap_or(MAX_RECONNECT_DELAY);
                error!("Discord connection failed: {:#}", e);
                warn!("Reconnecting in {:.1}s...", delay.as_secs_f64());
                sleep(delay).await;
            } else {
                info!("Discord client disconnected normally");
                break;
            }
        }
    }

    async fn process_events(
        discord_events_rx: &mut mpsc::UnboundedReceiver<DiscordBotEvent>,
        handler: &ResponderHandler,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                event = discord_events_rx.recv() => {
                    match event {
                        Some(DiscordBotEvent::Ready { context, ready }) => {
                            handler.handle_ready(context, ready).await;
                        }
                        Some(DiscordBotEvent::Message(message)) => {
                            handler.handle_message(message);
                        }
                        Some(DiscordBotEvent::Disconnected) => {
                            handler.handle_disconnect().await;
                        }
                        None => {
                            debug!("Discord events channel closed.");
                            break;
                        }
                    }
                }

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping event processing");
                        break;
                    }
                }
            }
        }
    }
}
