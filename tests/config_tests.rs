//! Tests for configuration module

use std::time::Duration;

use leapp_reporting::config::{Config, LogFormat, CONFIG};

#[test]
fn test_config_defaults() {
    // Create a config with defaults (env vars not set).
    // Config uses nested sub-configs: server, datasource.
    let config = Config::from_env();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert!(config.server.allowed_origins.is_empty());
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_datasource_defaults() {
    let datasource = Config::from_env().datasource;

    assert_eq!(datasource.elasticsearch_url, "http://localhost:9200");
    assert_eq!(datasource.index, "rhel_upgrade_reporting");
    assert_eq!(datasource.fetch_timeout, Duration::from_secs(10));
    assert_eq!(datasource.retries, 2);
    assert_eq!(datasource.page_size, 50);
    assert_eq!(datasource.host_limit, 1000);
}

#[test]
fn test_refresh_cadence_default() {
    let config = Config::from_env();
    assert_eq!(config.refresh_cadence, Duration::from_secs(20 * 60));
}

#[test]
fn test_version_from_cargo() {
    let config = Config::from_env();
    // Version should be set from Cargo.toml
    assert!(!config.version.is_empty());
    assert!(config.version.contains('.'));
}

#[test]
fn test_build_info_defaults() {
    let config = Config::from_env();
    assert_eq!(config.commit_hash, "unknown");
    assert_eq!(config.build_time, "unknown");
    assert_eq!(config.channel, "dev");
}

#[test]
fn test_global_config_is_initialized() {
    assert_eq!(CONFIG.server.port, Config::from_env().server.port);
    assert!(!CONFIG.datasource.index.is_empty());
}
