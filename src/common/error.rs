//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Phrase error: {0}")]
    Phrase(#[from] PhraseError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors raised while loading phrase rules.
#[derive(Debug, Error)]
pub enum PhraseError {
    #[error("Failed to read phrases from '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse phrase file '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid pattern '{pattern}' in '{rule}': {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },

    #[error("Phrase '{rule}' has no patterns")]
    NoPatterns { rule: String },
}

/// Discord-related errors.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Not connected to Discord")]
    NotConnected,

    #[error("Failed to send message to {target}: {message}")]
    SendFailed { target: u64, message: String },

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for Discord operations.
pub type DiscordResult<T> = std::result::Result<T, DiscordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_error_converts_to_app_error() {
        let err: AppError = PhraseError::NoPatterns {
            rule: "greeting".to_string(),
        }
        .into();
        assert!(err.to_string().contains("greeting"));
        assert!(err.to_string().starts_with("Phrase error"));
    }

    #[test]
    fn test_validation_error_message() {
        let err = ConfigError::ValidationError {
            message: "listenUser is required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Config validation failed: listenUser is required"
        );
    }
}
