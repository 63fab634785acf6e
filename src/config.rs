//! Configuration module
//!
//! Reads a TOML file (default `~/.config/reserve-eat/config.toml`,
//! overridable via the `RESERVE_EAT_CONFIG` environment variable). Every
//! section falls back to sensible defaults when absent.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::CapacityPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub reservations: ReservationsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight work during graceful shutdown
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Durable store locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the record store, ID counter and audit log
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn reservations_file(&self) -> PathBuf {
        self.data_dir.join("reservations.jsonl")
    }

    pub fn counter_file(&self) -> PathBuf {
        self.data_dir.join("last_id")
    }

    pub fn audit_file(&self) -> PathBuf {
        self.data_dir.join("settlements.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Reservation policy knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationsConfig {
    /// Fixed total number of tables
    pub pool_size: u32,
    /// Fixed per-booking service duration
    pub service_duration_minutes: i64,
    /// Whether Settled reservations keep occupying their tables
    pub settled_occupies_capacity: bool,
}

impl ReservationsConfig {
    pub fn capacity_policy(&self) -> CapacityPolicy {
        CapacityPolicy {
            pool_size: self.pool_size,
            settled_occupies: self.settled_occupies_capacity,
        }
    }

    pub fn service_duration(&self) -> Duration {
        Duration::minutes(self.service_duration_minutes)
    }
}

impl Default for ReservationsConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            service_duration_minutes: 120,
            settled_occupies_capacity: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, e.g. "info" or "reserve_eat=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Default config file location: `~/.config/reserve-eat/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reserve-eat")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────
