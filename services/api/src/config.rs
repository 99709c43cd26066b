//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
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
    /// PostgreSQL connection string. Without one, reading state lives in memory.
    pub database_url: Option<String>,
    pub log_level: Level,
    /// JSON file holding the ordered verse text. Without one, a text-less
    /// sequence covering the whole reference is used.
    pub corpus_path: Option<PathBuf>,
    pub cors_origin: String,
    /// How long a user's reading session stays in memory without requests.
    pub reader_idle_timeout: Duration,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
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

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        let idle_str = lookup("READER_IDLE_SECS").unwrap_or_else(|| "900".to_string());
        let reader_idle_timeout = match idle_str.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue(
                    "READER_IDLE_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", idle_str),
                ))
            }
        };

        // --- Storage and Data Settings ---
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let corpus_path = lookup("CORPUS_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            corpus_path,
            cors_origin,
            reader_idle_timeout,
        })
    }
}
