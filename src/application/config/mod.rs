pub mod datasource;
pub mod server;

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::staleness::DEFAULT_REFRESH_CADENCE;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub datasource: datasource::DataSourceConfig,

    /// How often the ingestion pipeline refreshes the index
    pub refresh_cadence: Duration,

    // Build info
    pub commit_hash: String,
    pub build_time: String,
    pub version: String,
    pub channel: String,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            datasource: datasource::DataSourceConfig::from_env(),

            refresh_cadence: env::var("LEAPP_REFRESH_CADENCE_MINUTES")
                .ok()
                .and_then(|m| m.parse::<u64>().ok())
                .filter(|m| *m > 0)
                .map(|m| Duration::from_secs(m * 60))
                .unwrap_or(DEFAULT_REFRESH_CADENCE),

            // Build info
            commit_hash: env::var("COMMIT_HASH").unwrap_or_else(|_| "unknown".to_string()),
            build_time: env::var("BUILD_TIME").unwrap_or_else(|_| "unknown".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            channel: env::var("CHANNEL").unwrap_or_else(|_| "dev".to_string()),

            // Logging
            log_level: env::var("LEAPP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: match env::var("LEAPP_LOG_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
