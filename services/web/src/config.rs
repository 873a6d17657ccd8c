//! services/web/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8501";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
/// How long a session with no events is kept before it may be dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not found. Check your .env file.")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub session_idle_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Load the API Key (required) ---
        let google_api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar(API_KEY_VAR.to_string()))?;

        // --- Load Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let session_idle_timeout = match lookup("SESSION_IDLE_MINUTES") {
            Some(minutes) => minutes
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .map(|m| Duration::from_secs(m * 60))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "SESSION_IDLE_MINUTES".to_string(),
                        format!("'{}' is not a positive number of minutes", minutes),
                    )
                })?,
            None => DEFAULT_SESSION_IDLE_TIMEOUT,
        };

        // --- Load Model Settings ---
        let gemini_model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let gemini_api_base =
            lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            bind_address,
            log_level,
            google_api_key,
            gemini_model,
            gemini_api_base,
            session_idle_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_reported_by_name() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref v) if v == API_KEY_VAR));
        assert_eq!(err.to_string(), "GOOGLE_API_KEY not found. Check your .env file.");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(config.google_api_key, "secret");
        assert_eq!(config.bind_address, "0.0.0.0:8501".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.gemini_api_base, DEFAULT_API_BASE);
        assert_eq!(config.session_idle_timeout, DEFAULT_SESSION_IDLE_TIMEOUT);
    }

    #[test]
    fn overrides_are_honoured() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("RUST_LOG", "debug"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_API_BASE", "http://localhost:8080/v1"),
            ("SESSION_IDLE_MINUTES", "15"),
        ]))
        .unwrap();
        assert_eq!(config.session_idle_timeout, Duration::from_secs(15 * 60));
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(config.gemini_api_base, "http://localhost:8080/v1");
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            ("BIND_ADDRESS", "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "BIND_ADDRESS"));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "secret"), ("RUST_LOG", "loud")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "RUST_LOG"));
    }

    #[test]
    fn zero_idle_minutes_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            ("SESSION_IDLE_MINUTES", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "SESSION_IDLE_MINUTES"));
    }
}
