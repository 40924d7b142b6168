//! Configuration type definitions.

use std::time::Duration;

use serde::Deserialize;

/// Default directory holding phrase files.
pub const DEFAULT_PHRASES_DIR: &str = "phrases";

/// Root configuration structure, as read from `config.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The Discord username to respond to.
    pub listen_user: String,
    /// The Discord token to log in with.
    pub token: String,
    /// Milliseconds to wait before responding to a message.
    pub delay: u64,
    /// Minimum milliseconds between two sent responses.
    #[serde(default)]
    pub flood: Option<u64>,
    /// Directory containing the phrase files.
    #[serde(default = "default_phrases_dir")]
    pub phrases: String,
}

fn default_phrases_dir() -> String {
    DEFAULT_PHRASES_DIR.to_string()
}

impl Config {
    /// Build the immutable responder configuration.
    ///
    /// A flood interval of zero disables the cooldown.
    pub fn responder_config(&self) -> ResponderConfig {
        ResponderConfig {
            listen_user: self.listen_user.clone(),
            delay: Duration::from_millis(self.delay),
            flood: self
                .flood
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }
}

/// Settings the responder needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderConfig {
    pub listen_user: String,
    pub delay: Duration,
    pub flood: Option<Duration>,
}
