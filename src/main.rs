//! Discord Responder - a single-user Discord autoresponder
//!
//! Listens for messages from one configured user and answers those that
//! match a phrase rule with a scripted reply, after a delay and subject to
//! a flood interval.

mod common;
mod config;
mod discord;
mod phrases;
mod responder;

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use config::{env::get_config_path, load_and_validate, Config};
use discord::{DiscordBot, DiscordSender};
use phrases::{load_phrases, PhraseRule};
use responder::Responder;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Discord Responder v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let (config, rules) = load_startup(&config_path).map_err(|e| {
        error!("Failed to start: {}", e);
        error!("Please ensure {} and its phrases directory exist and are valid.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Listen user: {}", config.listen_user);
    info!("  Delay: {}ms", config.delay);
    info!("  Flood: {}ms", config.flood.unwrap_or(0));
    info!("  Phrases: {} ({} rules)", config.phrases, rules.len());

    if rules.is_empty() {
        warn!("No phrase rules loaded - the responder will never reply");
    }

    let sender = Arc::new(DiscordSender::new());
    let responder = Arc::new(Responder::new(
        config.responder_config(),
        rules,
        sender.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let discord_bot = DiscordBot::build(config.token.clone(), responder, sender, shutdown_rx).await?;
    let mut discord_task = tokio::spawn(discord_bot.run());

    tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutting down...");
            if shutdown_tx.send(true).is_err() {
                warn!("Discord task already stopped");
            }
            if let Err(e) = discord_task.await {
                error!("Discord task failed: {}", e);
            }
        }
        result = &mut discord_task => {
            if let Err(e) = result {
                error!("Discord task failed: {}", e);
            }
        }
    }

    info!("Discord Responder stopped");
    Ok(())
}

/// Load the configuration and the phrase rules it points at.
fn load_startup(config_path: &str) -> common::error::Result<(Config, Vec<PhraseRule>)> {
    let config = load_and_validate(config_path)?;
    let rules = load_phrases(&config.phrases)?;
    Ok((config, rules))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
