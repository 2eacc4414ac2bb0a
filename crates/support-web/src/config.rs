//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Support chat server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Phone numbers promoted to staff when they log in.
    pub admin_phones: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SUPPORT_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:storefront.db?mode=rwc` |
    /// | `ADMIN_PHONES` | Comma-separated phones granted staff on login | `admin` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SUPPORT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:storefront.db?mode=rwc".to_string());

        let admin_phones = env::var("ADMIN_PHONES")
            .unwrap_or_else(|_| "admin".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            addr,
            database_url,
            admin_phones,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SUPPORT_ADDR format")]
    InvalidAddr,
}
