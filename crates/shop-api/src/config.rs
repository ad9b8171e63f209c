//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use shop_core::MIN_PASSWORD_LENGTH;
use shop_db::DbConfig;

/// Default tracing filter when neither `RUST_LOG` nor `SHOP_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,shop=debug,sqlx=warn";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file (`:memory:` for a throwaway database)
    pub db_path: PathBuf,

    /// Maximum pooled connections
    pub db_max_connections: u32,

    /// Minimum accepted password length on registration
    pub min_password_length: usize,

    /// Tracing filter directive
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from("shop.db"),
            db_max_connections: 5,
            min_password_length: MIN_PASSWORD_LENGTH,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            db_path: lookup("SHOP_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            db_max_connections: match lookup("SHOP_DB_MAX_CONNECTIONS") {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue("SHOP_DB_MAX_CONNECTIONS".to_string())
                })?,
                None => defaults.db_max_connections,
            },

            min_password_length: match lookup("SHOP_MIN_PASSWORD_LENGTH") {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue("SHOP_MIN_PASSWORD_LENGTH".to_string())
                })?,
                None => defaults.min_password_length,
            },

            log_filter: lookup("SHOP_LOG").unwrap_or(defaults.log_filter),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::OutOfRange {
                key: "SHOP_DB_MAX_CONNECTIONS".to_string(),
                min: 1,
            });
        }

        if config.min_password_length == 0 {
            return Err(ConfigError::OutOfRange {
                key: "SHOP_MIN_PASSWORD_LENGTH".to_string(),
                min: 1,
            });
        }

        Ok(config)
    }

    /// Database pool settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.db_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.db_path).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} must be at least {min}")]
    OutOfRange { key: String, min: u64 },
}
