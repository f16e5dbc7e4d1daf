use std::env;
use std::time::Duration;

/// Configuration for the Elasticsearch index the ingestion pipeline fills
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    /// Elasticsearch base URL (env: `ELASTICSEARCH_URL`)
    pub elasticsearch_url: String,
    /// Index holding one document per workflow execution (env: `ELASTICSEARCH_INDEX`)
    pub index: String,
    /// Per-request timeout (env: `LEAPP_FETCH_TIMEOUT_SECS`)
    pub fetch_timeout: Duration,
    /// Retries for transport and 5xx failures (env: `LEAPP_FETCH_RETRIES`)
    pub retries: u32,
    /// Rows per workflow list page (env: `LEAPP_PAGE_SIZE`)
    pub page_size: u32,
    /// Maximum hosts returned by the host list (env: `LEAPP_HOST_LIMIT`)
    pub host_limit: u32,
}

impl DataSourceConfig {
    pub fn from_env() -> Self {
        Self {
            elasticsearch_url: env::var("ELASTICSEARCH_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:9200".to_string()),
            index: env::var("ELASTICSEARCH_INDEX")
                .unwrap_or_else(|_| "rhel_upgrade_reporting".to_string()),
            fetch_timeout: Duration::from_secs(parse_or("LEAPP_FETCH_TIMEOUT_SECS", 10)),
            retries: parse_or("LEAPP_FETCH_RETRIES", 2),
            page_size: parse_or("LEAPP_PAGE_SIZE", 50).max(1),
            host_limit: parse_or("LEAPP_HOST_LIMIT", 1000).max(1),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
