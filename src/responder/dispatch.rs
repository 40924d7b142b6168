//! Message dispatch with delayed replies and flood control.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::config::ResponderConfig;
use crate::phrases::{MatchGroups, PhraseMatch, PhraseRule};
use crate::responder::client::{ChatClient, IncomingMessage};

/// What `on_message` did with a message.
#[derive(Debug)]
pub enum Dispatch {
    /// Not from the listen user.
    Ignored,
    /// No pattern matched the content.
    NoMatch,
    /// Matched, but dropped because the flood interval has not elapsed.
    Suppressed,
    /// Handler scheduled to run after the configured delay.
    Scheduled(JoinHandle<()>),
}

/// Replies to one user's messages with the handlers of matching phrases.
pub struct Responder {
    config: ResponderConfig,
    rules: Vec<PhraseRule>,
    client: Arc<dyn ChatClient>,
    /// When a handler last ran. Only moves forward.
    last_sent: Mutex<Instant>,
}

impl Responder {
    pub fn new(config: ResponderConfig, rules: Vec<PhraseRule>, client: Arc<dyn ChatClient>) -> Self {
        Self {
            config,
            rules,
            client,
            last_sent: Mutex::new(Instant::now()),
        }
    }

    /// Handle the chat client becoming ready.
    pub fn on_ready(&self, connected_as: &str) {
        info!(
            "Discord Responder connected as {}, ready and waiting for {}.",
            connected_as, self.config.listen_user
        );
    }

    /// Handle an incoming message.
    ///
    /// Returns immediately; a matching message from the listen user has its
    /// handler scheduled on the runtime after the configured delay.
    pub fn on_message(self: &Arc<Self>, message: IncomingMessage) -> Dispatch {
        if !self.is_allowed_user(&message.author_name) {
            return Dispatch::Ignored;
        }

        info!("Message from {}: {}", self.config.listen_user, message.content);

        let Some(matching) = self.find_match(&message) else {
            return Dispatch::NoMatch;
        };

        info!(
            "\"{}\" matches \"{}\" ({}).",
            message.content,
            matching.pattern.as_str(),
            matching.rule
        );
        debug!("Matched text: {}", matching.groups.full());

        if !self.has_cooldown_elapsed() {
            warn!("Not processing anything because it has been too soon.");
            return Dispatch::Suppressed;
        }

        let responder = Arc::clone(self);
        let delay = self.config.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            matching
                .handler
                .handle(&message, &matching.groups, &responder);
            responder.mark_sent();
        });

        Dispatch::Scheduled(handle)
    }

    /// Find the phrase matching a message's content.
    ///
    /// Every pattern of every rule is tried in order and the last one that
    /// matches wins, so a later, more specific pattern overrides an earlier
    /// generic one.
    pub fn find_match(&self, message: &IncomingMessage) -> Option<PhraseMatch> {
        let mut result = None;

        for rule in &self.rules {
            for pattern in &rule.patterns {
                match pattern.captures(&message.content) {
                    Ok(Some(captures)) => {
                        result = Some(PhraseMatch {
                            rule: rule.name.clone(),
                            pattern: pattern.clone(),
                            groups: MatchGroups::from_captures(pattern, &captures),
                            handler: Arc::clone(&rule.handler),
                        });
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Regex match error for pattern '{}': {}", pattern.as_str(), e);
                    }
                }
            }
        }

        result
    }

    /// Whether enough time has passed since the last reply.
    pub fn has_cooldown_elapsed(&self) -> bool {
        match self.config.flood {
            Some(flood) if !flood.is_zero() => {
                Instant::now().saturating_duration_since(self.last_sent()) > flood
            }
            _ => true,
        }
    }

    /// Send a message without waiting for the result.
    ///
    /// Failures are logged and not retried.
    pub fn send_message(&self, target: u64, text: impl Into<String>) {
        let client = Arc::clone(&self.client);
        let text = text.into();

        tokio::spawn(async move {
            match client.send_message(target, &text).await {
                Ok(sent) => info!("Sent message: {}", sent),
                Err(e) => error!("Failed to send message to {}: {}", target, e),
            }
        });
    }

    /// Check if the given username is the one we listen to.
    pub fn is_allowed_user(&self, name: &str) -> bool {
        name == self.config.listen_user
    }

    pub fn last_sent(&self) -> Instant {
        *self.last_sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that a reply was just sent.
    pub fn mark_sent(&self) {
        let mut last_sent = self.last_sent.lock().unwrap_or_else(PoisonError::into_inner);
        *last_sent = (*last_sent).max(Instant::now());
    }
}
