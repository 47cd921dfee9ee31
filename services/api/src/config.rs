//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which document store implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local and lost on restart; for local development.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("'{}' is not one of postgres, memory", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub auth_url: String,
    pub auth_timeout: Duration,
    /// Skips the auth gate entirely. Never enable outside local development.
    pub auth_disabled: bool,
    pub body_limit_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address: SocketAddr = parse_or(&lookup, "BIND_ADDRESS", "0.0.0.0:3002".parse().ok())?;
        let body_limit_bytes: usize = parse_or(&lookup, "BODY_LIMIT_BYTES", Some(1024 * 1024))?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Settings ---
        let storage_backend: StorageBackend =
            parse_or(&lookup, "STORAGE_BACKEND", Some(StorageBackend::Postgres))?;
        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }
        let db_max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", Some(10))?;

        // --- Auth Authority Settings ---
        let auth_url = lookup("AUTH_URL")
            .unwrap_or_else(|| "http://localhost:3005/auth/checkauth".to_string());
        if !(auth_url.starts_with("http://") || auth_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "AUTH_URL".to_string(),
                format!("'{}' is not an http(s) URL", auth_url),
            ));
        }
        let auth_timeout = Duration::from_secs(parse_or(&lookup, "AUTH_TIMEOUT_SECS", Some(5))?);
        let auth_disabled: bool = parse_or(&lookup, "AUTH_DISABLED", Some(false))?;

        Ok(Self {
            bind_address,
            storage_backend,
            database_url,
            db_max_connections,
            log_level,
            auth_url,
            auth_timeout,
            auth_disabled,
            body_limit_bytes,
        })
    }
}

/// Parses `key` if set, otherwise falls back to `default`. A `None` default
/// makes the variable required.
fn parse_or<T, F>(lookup: &F, key: &str, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => default.ok_or_else(|| ConfigError::MissingVar(key.to_string())),
    }
}
