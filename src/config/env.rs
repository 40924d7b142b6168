//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `RESPONDER_DISCORD_TOKEN` - Discord token
//! - `RESPONDER_LISTEN_USER` - Username to respond to
//! - `RESPONDER_DELAY_MS` - Response delay in milliseconds
//! - `RESPONDER_FLOOD_MS` - Flood interval in milliseconds
//! - `RESPONDER_PHRASES_DIR` - Directory containing phrase files

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "RESPONDER";

/// Apply environment variable overrides to a config.
///
/// This allows the token to be provided via the environment instead of
/// the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.token = token;
    }

    if let Ok(user) = env::var(format!("{}_LISTEN_USER", ENV_PREFIX)) {
        config.listen_user = user;
    }

    // Timing
    if let Ok(delay) = env::var(format!("{}_DELAY_MS", ENV_PREFIX)) {
        if let Ok(delay) = delay.parse() {
            config.delay = delay;
        }
    }
    if let Ok(flood) = env::var(format!("{}_FLOOD_MS", ENV_PREFIX)) {
        if let Ok(flood) = flood.parse() {
            config.flood = Some(flood);
        }
    }

    if let Ok(dir) = env::var(format!("{}_PHRASES_DIR", ENV_PREFIX)) {
        config.phrases = dir;
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `RESPONDER_CONFIG` environment variable, otherwise returns "config.json".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "config.json".to_string())
}

/// Serializes tests that touch `RESPONDER_*` variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    const OVERRIDE_VARS: [&str; 6] = [
        "RESPONDER_DISCORD_TOKEN",
        "RESPONDER_LISTEN_USER",
        "RESPONDER_DELAY_MS",
        "RESPONDER_FLOOD_MS",
        "RESPONDER_PHRASES_DIR",
        "RESPONDER_CONFIG",
    ];

    fn clear_env() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
    }

    fn make_test_config() -> Config {
        Config {
            listen_user: "Test".to_string(),
            token: "original_token".to_string(),
            delay: 1000,
            flood: None,
            phrases: "phrases".to_string(),
        }
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(ENV_PREFIX, "RESPONDER");
    }

    #[test]
    fn test_get_config_path_default() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        assert_eq!(get_config_path(), "config.json");

        env::set_var("RESPONDER_CONFIG", "/etc/responder.json");
        assert_eq!(get_config_path(), "/etc/responder.json");
        clear_env();
    }

    #[test]
    fn test_apply_env_overrides_no_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let result = apply_env_overrides(make_test_config());

        assert_eq!(result.token, "original_token");
        assert_eq!(result.listen_user, "Test");
        assert_eq!(result.delay, 1000);
        assert_eq!(result.flood, None);
        assert_eq!(result.phrases, "phrases");
    }

    #[test]
    fn test_apply_env_overrides_all_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("RESPONDER_DISCORD_TOKEN", "env_token");
        env::set_var("RESPONDER_LISTEN_USER", "Someone");
        env::set_var("RESPONDER_DELAY_MS", "250");
        env::set_var("RESPONDER_FLOOD_MS", "5000");
        env::set_var("RESPONDER_PHRASES_DIR", "/srv/phrases");

        let result = apply_env_overrides(make_test_config());
        clear_env();

        assert_eq!(result.token, "env_token");
        assert_eq!(result.listen_user, "Someone");
        assert_eq!(result.delay, 250);
        assert_eq!(result.flood, Some(5000));
        assert_eq!(result.phrases, "/srv/phrases");
    }

    #[test]
    fn test_unparseable_numbers_ignored() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("RESPONDER_DELAY_MS", "later");
        env::set_var("RESPONDER_FLOOD_MS", "soon");

        let result = apply_env_overrides(make_test_config());
        clear_env();

        assert_eq!(result.delay, 1000);
        assert_eq!(result.flood, None);
    }
}
