//! Configuration validation.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Token value shipped in the sample configuration.
const PLACEHOLDER_TOKEN: &str = "YOUR_DISCORD_TOKEN_HERE";

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.listen_user.is_empty() {
        errors.push("listenUser is required".to_string());
    }

    if config.token.is_empty() {
        errors.push("token is required".to_string());
    }
    if config.token == PLACEHOLDER_TOKEN {
        errors.push("token has not been configured (still using placeholder)".to_string());
    }

    if config.phrases.is_empty() {
        errors.push("phrases directory must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_valid_config() -> Config {
        Config {
            listen_user: "Test".to_string(),
            token: "valid_token_here".to_string(),
            delay: 1500,
            flood: Some(10000),
            phrases: "phrases".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&make_valid_config()).is_ok());
    }

    #[test]
    fn test_empty_listen_user_fails() {
        let mut config = make_valid_config();
        config.listen_user = String::new();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("listenUser"));
    }

    #[test]
    fn test_placeholder_token_fails() {
        let mut config = make_valid_config();
        config.token = PLACEHOLDER_TOKEN.to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = make_valid_config();
        config.listen_user = String::new();
        config.token = String::new();

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("listenUser"));
        assert!(message.contains("token is required"));
    }
}
