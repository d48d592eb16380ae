//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// Immutable after load; components receive what they need at construction
/// instead of reading the environment ad hoc.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub jwt_secret: String,
    pub google_books_base_url: String,
    pub google_books_lang: String,
    pub default_daily_goal: f64,
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

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5005".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Auth ---
        // Secrets get no fallback: a missing JWT secret must fail startup.
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        // --- Metadata Provider Settings ---
        let google_books_base_url = std::env::var("GOOGLE_BOOKS_BASE_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/books/v1".to_string());
        let google_books_lang =
            std::env::var("GOOGLE_BOOKS_LANG").unwrap_or_else(|_| "pt".to_string());

        // --- Reading Goals ---
        let default_daily_goal = match std::env::var("DEFAULT_DAILY_GOAL") {
            Ok(raw) => raw.parse::<f64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "DEFAULT_DAILY_GOAL".to_string(),
                    format!("'{}' is not a number", raw),
                )
            })?,
            Err(_) => 10.0,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            jwt_secret,
            google_books_base_url,
            google_books_lang,
            default_daily_goal,
        })
    }
}
