//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Directory holding the JSON-file collections.
    pub data_dir: PathBuf,
    /// When set, chat messages and meal plans are kept in PostgreSQL.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub chat_model: String,
    pub cors_origin: String,
    pub session_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_dir: PathBuf::from("./data"),
            database_url: None,
            log_level: Level::INFO,
            openai_api_key: None,
            chat_model: "gpt-4o-mini".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            session_days: 30,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        // --- Load Server and Storage Settings ---
        let bind_address = match std::env::var("BIND_ADDRESS") {
            Ok(value) => value.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            Err(_) => defaults.bind_address,
        };

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load the Chat Responder Settings ---
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let chat_model = std::env::var("CHAT_MODEL").unwrap_or(defaults.chat_model);

        // --- Load HTTP Settings ---
        let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin);
        let session_days = match std::env::var("SESSION_DAYS") {
            Ok(value) => match value.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "SESSION_DAYS".to_string(),
                        format!("'{}' is not a positive number of days", value),
                    ))
                }
            },
            Err(_) => defaults.session_days,
        };

        Ok(Self {
            bind_address,
            data_dir,
            database_url,
            log_level,
            openai_api_key,
            chat_model,
            cors_origin,
            session_days,
        })
    }
}
