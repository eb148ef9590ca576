//! Application configuration management.
//!
//! Configuration is read once at startup from environment variables (a
//! `.env` file is honoured). Missing or malformed values are reported with
//! the name of the offending variable.
//!
//! # Example
//!
//! ```rust,ignore
//! use reward_tasks::infrastructure::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! println!("Listening on {}:{}", config.app_host, config.app_port);
//! ```

use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::ExternalId;

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The name of the environment variable.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

/// Where the market state lives.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through a connection pool.
    Postgres {
        /// Connection string.
        database_url: String,
        /// Pool size.
        max_connections: u32,
    },
    /// Process memory; lost on restart.
    Memory,
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres {
                max_connections, ..
            } => formatter
                .debug_struct("Postgres")
                .field("database_url", &"<redacted>")
                .field("max_connections", max_connections)
                .finish(),
            Self::Memory => formatter.write_str("Memory"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Application configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bot token the identity signature key is derived from.
    pub bot_token: String,
    /// Storage backend.
    pub storage: StorageBackend,
    /// Platform identities allowed on admin routes.
    pub admin_ids: HashSet<ExternalId>,
    /// HTTP server host address.
    pub app_host: String,
    /// HTTP server port.
    pub app_port: u16,
    /// Log output format.
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("storage", &self.storage)
            .field("admin_ids", &self.admin_ids)
            .field("app_host", &self.app_host)
            .field("app_port", &self.app_port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BOT_TOKEN`: platform bot token (required)
    /// - `STORAGE_BACKEND`: `postgres` or `memory` (optional, default: `postgres`)
    /// - `DATABASE_URL`: Postgres connection string (required for `postgres`)
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (optional, default: 10)
    /// - `ADMIN_IDS`: comma-separated external ids (optional, default: none)
    /// - `APP_HOST`: Server host (optional, default: "0.0.0.0")
    /// - `APP_PORT`: Server port (optional, default: 8080)
    /// - `LOG_FORMAT`: `pretty` or `json` (optional, default: `pretty`)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required variable is not set.
    /// Returns `ConfigError::InvalidValue` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an explicit key/value map.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_map(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = get_required(&lookup, "BOT_TOKEN")?;

        let storage = match get_optional(&lookup, "STORAGE_BACKEND", "postgres")
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres {
                database_url: get_required(&lookup, "DATABASE_URL")?,
                max_connections: get_optional_parsed(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "STORAGE_BACKEND".to_string(),
                    message: format!("expected `postgres` or `memory`, got `{other}`"),
                });
            }
        };

        let admin_ids = parse_admin_ids(&get_optional(&lookup, "ADMIN_IDS", ""))?;
        let app_host = get_optional(&lookup, "APP_HOST", "0.0.0.0");
        let app_port = get_optional_parsed(&lookup, "APP_PORT", 8080)?;
        let log_format = get_optional_parsed(&lookup, "LOG_FORMAT", LogFormat::Pretty)?;

        Ok(Self {
            bot_token,
            storage,
            admin_ids,
            app_host,
            app_port,
            log_format,
        })
    }

    /// Returns `true` if `external_id` may use admin routes.
    #[must_use]
    pub fn is_admin(&self, external_id: ExternalId) -> bool {
        self.admin_ids.contains(&external_id)
    }
}

/// Gets a required variable; blank values count as missing.
fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Gets an optional variable with a default value.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Gets an optional variable and parses it, with a default value.
fn get_optional_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key).map_or_else(
        || Ok(default),
        |value| {
            value
                .trim()
                .parse()
                .map_err(|error: T::Err| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: error.to_string(),
                })
        },
    )
}

fn parse_admin_ids(raw: &str) -> Result<HashSet<ExternalId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<i64>()
                .map(ExternalId::new)
                .map_err(|error| ConfigError::InvalidValue {
                    key: "ADMIN_IDS".to_string(),
                    message: format!("`{entry}`: {error}"),
                })
        })
        .collect()
}
