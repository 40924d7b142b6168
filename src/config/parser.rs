//! Configuration file parsing (JSON format).

use std::fs;
use std::path::Path;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_str(&content)
}

/// Load configuration from a JSON string.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DEFAULT_PHRASES_DIR;

    #[test]
    fn test_parse_full_config() {
        let config = load_config_str(
            r#"{
                "listenUser": "Test",
                "token": "abc",
                "delay": 1500,
                "flood": 10000,
                "phrases": "/etc/responder/phrases"
            }"#,
        )
        .unwrap();

        assert_eq!(config.listen_user, "Test");
        assert_eq!(config.token, "abc");
        assert_eq!(config.delay, 1500);
        assert_eq!(config.flood, Some(10000));
        assert_eq!(config.phrases, "/etc/responder/phrases");
    }

    #[test]
    fn test_optional_fields_default() {
        let config =
            load_config_str(r#"{"listenUser": "Test", "token": "abc", "delay": 0}"#).unwrap();

        assert_eq!(config.flood, None);
        assert_eq!(config.phrases, DEFAULT_PHRASES_DIR);
    }

    #[test]
    fn test_missing_delay_fails() {
        let result = load_config_str(r#"{"listenUser": "Test", "token": "abc"}"#);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = load_config("/nonexistent/responder/config.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
