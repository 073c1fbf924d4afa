//! Application configuration loading and validation.
//!
//! Configuration is a TOML file with `[database]`, `[server]` and `[logging]`
//! sections, every field optional. `ORDERDESK_DATABASE` overrides the database
//! path.
//!
//! # Example
//!
//! ```no_run
//! use orderdesk::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("orderdesk.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::sqlite::database::connection::DEFAULT_POOL_SIZE;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `[database] path`.
pub const DATABASE_ENV: &str = "ORDERDESK_DATABASE";

/// SQLite database settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub path: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "orderdesk.db".to_string(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

/// TCP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the line-delimited JSON listener binds to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7878".to_string(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(path) = std::env::var(DATABASE_ENV) {
            config.database.path = path;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when given, otherwise use defaults with environment
    /// overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::parse_toml(""),
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.path",
            }
            .into());
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.pool_size",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if let Err(e) = self.server.bind.parse::<SocketAddr>() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind",
                reason: e.to_string(),
            }
            .into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected pretty or json, got {}", self.logging.format),
            }
            .into());
        }
        Ok(())
    }

    /// Pool size actually used: an in-memory database is private to each
    /// connection, so it gets exactly one.
    #[must_use]
    pub fn effective_pool_size(&self) -> u32 {
        if self.database.path == ":memory:" {
            1
        } else {
            self.database.pool_size
        }
    }

    /// Bind address, already validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not parse.
    #[allow(clippy::result_large_err)]
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                field: "server.bind",
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
