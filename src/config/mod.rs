//! Configuration loading for the Bookings API.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `BOOKINGS_`, producing a typed [`AppConfig`].

use std::{collections::BTreeMap, env, net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application configuration derived from `BOOKINGS_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    /// Upper bound on the booking critical section, in milliseconds. A
    /// booking attempt that cannot acquire the per-staff lock within this
    /// window fails closed with a transient error.
    #[serde(default = "default_booking_lock_timeout_ms")]
    pub booking_lock_timeout_ms: u64,
}

fn default_profile() -> String {
    "dev".to_string()
}

fn default_api_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost:5432/bookings".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_booking_lock_timeout_ms() -> u64 {
    5_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_bind_addr: default_api_bind_addr(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            booking_lock_timeout_ms: default_booking_lock_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Validates configuration bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: self.api_bind_addr.clone(),
                source,
            })?;

        if self.database_url.is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidDbMaxConnections {
                value: self.db_max_connections,
            });
        }

        if self.booking_lock_timeout_ms < 100 || self.booking_lock_timeout_ms > 60_000 {
            return Err(ConfigError::InvalidBookingLockTimeout {
                value: self.booking_lock_timeout_ms,
            });
        }

        Ok(())
    }

    /// Parses the configured bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.api_bind_addr.parse()
    }

    /// Serializes the configuration for startup logging. The current schema
    /// carries no secrets beyond the database URL, which is masked.
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut redacted = self.clone();
        redacted.database_url = mask_database_url(&redacted.database_url);
        serde_json::to_string(&redacted)
    }
}

fn mask_database_url(url: &str) -> String {
    match url.split_once('@') {
        Some((_credentials, rest)) => format!("***@{rest}"),
        None => url.to_string(),
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid api bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("database URL is missing; set BOOKINGS_DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("db max connections must be positive, got {value}")]
    InvalidDbMaxConnections { value: u32 },
    #[error("booking lock timeout must be between 100 and 60000 ms, got {value}")]
    InvalidBookingLockTimeout { value: u64 },
}

/// Loads [`AppConfig`] from layered `.env` files plus process environment.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads configuration: `.env`, then `.env.{profile}`, then process
    /// environment, later layers winning.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix("BOOKINGS_") {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let api_bind_addr = layered
            .remove("API_BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api_bind_addr);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);
        let database_url = layered
            .remove("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_database_url);
        let db_max_connections = layered
            .remove("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_max_connections);
        let db_acquire_timeout_ms = layered
            .remove("DB_ACQUIRE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_acquire_timeout_ms);
        let booking_lock_timeout_ms = layered
            .remove("BOOKING_LOCK_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_booking_lock_timeout_ms);

        let config = AppConfig {
            profile,
            api_bind_addr,
            log_level,
            log_format,
            database_url,
            db_max_connections,
            db_acquire_timeout_ms,
            booking_lock_timeout_ms,
        };

        config.validate()?;

        Ok(config)
    }

    /// Reads `.env` and `.env.{profile}` into a map of `BOOKINGS_`-stripped
    /// keys, returning the map and the profile that was resolved.
    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut layered = BTreeMap::new();

        let base = self.base_dir.join(".env");
        self.read_env_file(&base, &mut layered)?;

        let profile = env::var("BOOKINGS_PROFILE")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| layered.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        let profile_file = self.base_dir.join(format!(".env.{profile}"));
        self.read_env_file(&profile_file, &mut layered)?;

        Ok((layered, profile))
    }

    fn read_env_file(
        &self,
        path: &PathBuf,
        layered: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }

        for item in dotenvy::from_path_iter(path).map_err(|source| ConfigError::EnvFile {
            path: path.clone(),
            source,
        })? {
            let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                path: path.clone(),
                source,
            })?;
            if let Some(stripped) = key.strip_prefix("BOOKINGS_") {
                layered.insert(stripped.to_string(), value);
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
