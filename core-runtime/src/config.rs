//! # Server Configuration Module
//!
//! Provides configuration management for the catalog server.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ServerConfig`. `build()` validates eagerly so a misconfigured process
//! fails at start-up instead of on the first request.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::ServerConfig;
//!
//! let config = ServerConfig::builder()
//!     .database_url("sqlite:catalog.db")
//!     .bind_address("0.0.0.0:8080")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.pagination.max_limit, 50);
//! ```
//!
//! ## Environment
//!
//! [`ServerConfig::from_env`] reads:
//!
//! | variable | default |
//! |----------|---------|
//! | `CATALOG_DATABASE_URL` | required |
//! | `CATALOG_BIND_ADDRESS` | `127.0.0.1:3000` |
//! | `CATALOG_MAX_CONNECTIONS` | `5` |
//! | `CATALOG_LOG_FORMAT` | `pretty` (debug) / `json` (release) |
//! | `CATALOG_LOG_LEVEL` | `info` |

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LogLevel, LoggingConfig};

pub const ENV_DATABASE_URL: &str = "CATALOG_DATABASE_URL";
pub const ENV_BIND_ADDRESS: &str = "CATALOG_BIND_ADDRESS";
pub const ENV_MAX_CONNECTIONS: &str = "CATALOG_MAX_CONNECTIONS";
pub const ENV_LOG_FORMAT: &str = "CATALOG_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Bounds applied to every `limit` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    /// Limit used when the request omits it
    pub default_limit: u32,
    /// Smallest accepted limit
    pub min_limit: u32,
    /// Largest accepted limit
    pub max_limit: u32,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            min_limit: 1,
            max_limit: 50,
        }
    }
}

impl PaginationLimits {
    pub fn validate(&self) -> Result<()> {
        if self.min_limit == 0 {
            return Err(Error::Config(
                "Minimum page limit must be at least 1".to_string(),
            ));
        }

        if self.min_limit > self.max_limit {
            return Err(Error::Config(format!(
                "Minimum page limit {} exceeds maximum {}",
                self.min_limit, self.max_limit
            )));
        }

        if !(self.min_limit..=self.max_limit).contains(&self.default_limit) {
            return Err(Error::Config(format!(
                "Default page limit {} must lie within [{}, {}]",
                self.default_limit, self.min_limit, self.max_limit
            )));
        }

        Ok(())
    }
}

/// Configuration for the catalog server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// sqlx database URL (`sqlite:catalog.db`, `sqlite::memory:`)
    pub database_url: String,

    /// Socket address the HTTP listener binds to
    pub bind_address: String,

    /// Upper bound on pooled database connections
    pub max_connections: u32,

    /// Page size bounds for list endpoints
    pub pagination: PaginationLimits,

    /// Log output format
    pub log_format: LogFormat,

    /// Minimum log level
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Creates a new builder for constructing a `ServerConfig`.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// [`from_env`](Self::from_env) delegates here with `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(url) = lookup(ENV_DATABASE_URL) {
            builder = builder.database_url(url);
        }

        if let Some(address) = lookup(ENV_BIND_ADDRESS) {
            builder = builder.bind_address(address);
        }

        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            let max = raw.trim().parse::<u32>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_CONNECTIONS, raw
                ))
            })?;
            builder = builder.max_connections(max);
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            builder = builder.log_format(raw.parse()?);
        }

        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            builder = builder.log_level(raw.parse()?);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(Error::Config("Bind address cannot be empty".to_string()));
        }

        if self.max_connections == 0 {
            return Err(Error::Config(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        self.pagination.validate()
    }

    /// Logging configuration derived from this server configuration.
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_format(self.log_format)
            .with_level(self.log_level)
    }
}

/// Builder for constructing [`ServerConfig`] instances.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    bind_address: Option<String>,
    max_connections: Option<u32>,
    pagination: Option<PaginationLimits>,
    log_format: Option<LogFormat>,
    log_level: Option<LogLevel>,
}

impl ServerConfigBuilder {
    /// Sets the database URL (required).
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the listener address.
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = Some(address.into());
        self
    }

    /// Sets the maximum pool size.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Overrides the page size bounds.
    pub fn pagination(mut self, limits: PaginationLimits) -> Self {
        self.pagination = Some(limits);
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Builds the configuration, failing fast on missing or invalid values.
    ///
    /// # Errors
    ///
    /// - `database_url` was never set
    /// - any value fails [`ServerConfig::validate`]
    pub fn build(self) -> Result<ServerConfig> {
        let database_url = self.database_url.ok_or_else(|| {
            Error::Config(format!(
                "Database URL is required. Set {} or call database_url() on the builder.",
                ENV_DATABASE_URL
            ))
        })?;

        let config = ServerConfig {
            database_url,
            bind_address: self
                .bind_address
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            pagination: self.pagination.unwrap_or_default(),
            log_format: self.log_format.unwrap_or_default(),
            log_level: self.log_level.unwrap_or(LogLevel::Info),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_requires_database_url() {
        let err = ServerConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains("Database URL is required"));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ServerConfig::builder()
            .database_url("sqlite::memory:")
            .build()
            .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.pagination, PaginationLimits::default());
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_validate_rejects_zero_connections() {
        let result = ServerConfig::builder()
            .database_url("sqlite::memory:")
            .max_connections(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_pagination_limits_validation() {
        assert!(PaginationLimits::default().validate().is_ok());

        let inverted = PaginationLimits {
            default_limit: 10,
            min_limit: 20,
            max_limit: 5,
        };
        assert!(inverted.validate().is_err());

        let default_out_of_range = PaginationLimits {
            default_limit: 100,
            min_limit: 1,
            max_limit: 50,
        };
        assert!(default_out_of_range.validate().is_err());

        let zero_min = PaginationLimits {
            default_limit: 1,
            min_limit: 0,
            max_limit: 5,
        };
        assert!(zero_min.validate().is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (ENV_DATABASE_URL, "sqlite:catalog.db"),
            (ENV_BIND_ADDRESS, "0.0.0.0:8080"),
            (ENV_MAX_CONNECTIONS, "12"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_LOG_LEVEL, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite:catalog.db");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_from_lookup_rejects_bad_connection_count() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            (ENV_DATABASE_URL, "sqlite:catalog.db"),
            (ENV_MAX_CONNECTIONS, "many"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_lookup_requires_database_url() {
        assert!(ServerConfig::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_logging_config_follows_server_config() {
        let config = ServerConfig::builder()
            .database_url("sqlite::memory:")
            .log_format(LogFormat::Compact)
            .log_level(LogLevel::Warn)
            .build()
            .unwrap();

        let logging = config.logging();
        assert_eq!(logging.format, LogFormat::Compact);
        assert_eq!(logging.level, LogLevel::Warn);
    }
}
