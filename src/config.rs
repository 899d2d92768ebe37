//! Configuration module for DreamEcho.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{DreamEchoError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Feed fetching and caching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Freshness window of a cached feed in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Maximum number of cached feeds.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
    /// Interval between stale-entry sweeps in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_feed_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_feed_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total fetch timeout in seconds.
    #[serde(default = "default_feed_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// Reject feed URLs that point at private or loopback hosts.
    #[serde(default = "default_block_private_hosts")]
    pub block_private_hosts: bool,
}

fn default_cache_ttl() -> u64 {
    24 * 60 * 60
}

fn default_cache_max_entries() -> usize {
    1000
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_feed_connect_timeout() -> u64 {
    10
}

fn default_feed_read_timeout() -> u64 {
    20
}

fn default_feed_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_block_private_hosts() -> bool {
    true
}

impl FeedConfig {
    /// Freshness window as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Total fetch timeout as a Duration.
    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            cache_max_entries: default_cache_max_entries(),
            sweep_interval_secs: default_sweep_interval(),
            connect_timeout_secs: default_feed_connect_timeout(),
            read_timeout_secs: default_feed_read_timeout(),
            total_timeout_secs: default_feed_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            block_private_hosts: default_block_private_hosts(),
        }
    }
}

/// Audio proxy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_proxy_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout (between chunks) in seconds.
    #[serde(default = "default_proxy_read_timeout")]
    pub read_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// `max-age` advertised to browsers for proxied audio.
    #[serde(default = "default_proxy_cache_max_age")]
    pub cache_max_age_secs: u64,
    /// Reject audio URLs that point at private or loopback hosts.
    #[serde(default = "default_block_private_hosts")]
    pub block_private_hosts: bool,
}

fn default_proxy_connect_timeout() -> u64 {
    10
}

fn default_proxy_read_timeout() -> u64 {
    30
}

fn default_proxy_cache_max_age() -> u64 {
    3600 // 1 hour
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_proxy_connect_timeout(),
            read_timeout_secs: default_proxy_read_timeout(),
            max_redirects: default_max_redirects(),
            cache_max_age_secs: default_proxy_cache_max_age(),
            block_private_hosts: default_block_private_hosts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Audio proxy configuration.
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DreamEchoError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DreamEchoError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DREAMECHO_HOST`: bind address
    /// - `DREAMECHO_PORT`: listen port
    /// - `DREAMECHO_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("DREAMECHO_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("DREAMECHO_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid DREAMECHO_PORT: {}", port),
            }
        }

        if let Ok(level) = std::env::var("DREAMECHO_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.feed.total_timeout_secs == 0 {
            return Err(DreamEchoError::Config(
                "feed.total_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.feed.cache_max_entries == 0 {
            return Err(DreamEchoError::Config(
                "feed.cache_max_entries must be greater than zero".to_string(),
            ));
        }
        if self.feed.sweep_interval_secs == 0 {
            return Err(DreamEchoError::Config(
                "feed.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
