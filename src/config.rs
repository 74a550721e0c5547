/// Configuration management for the feed sync service
///
/// All settings come from environment variables with sensible defaults, so
/// an embedding application can construct the service without any setup.
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Remote store settings
    pub store: StoreConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Log level filter for the embedding application
    pub log_level: String,
}

/// Remote store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Document collection holding the posts
    pub collection: String,
    /// How long to wait for the first snapshot before substituting the
    /// demo fallback list
    pub snapshot_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "posts".to_string(),
            snapshot_timeout_ms: 5000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            store: StoreConfig {
                collection: std::env::var("FEED_COLLECTION")
                    .unwrap_or_else(|_| "posts".to_string()),
                snapshot_timeout_ms: std::env::var("SNAPSHOT_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .map_err(|e| {
                        AppError::Config(format!("invalid SNAPSHOT_TIMEOUT_MS: {}", e))
                    })?,
            },
        })
    }
}
