//! Runtime configuration.
//!
//! Loaded from environment variables with development defaults:
//!
//! - `REGISTRY_BIND`: listen address (default `0.0.0.0:3000`)
//! - `REGISTRY_DATABASE`: `memory` (default) for the in-memory store, any
//!   other value is a SQLite database path (`:memory:` for a private one)
//! - `REGISTRY_LOG`: tracing filter directive (default `info`); `RUST_LOG`
//!   wins when set

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which entity store backend to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local, non-durable tables.
    Memory,
    /// SQLite database file (or `:memory:`).
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub log_filter: String,
}

impl RegistryConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("REGISTRY_BIND")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind.trim().parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: "REGISTRY_BIND",
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        let storage = match lookup("REGISTRY_DATABASE") {
            None => StorageConfig::Memory,
            Some(v) if v.trim().is_empty() || v.trim().eq_ignore_ascii_case("memory") => {
                StorageConfig::Memory
            }
            Some(v) => StorageConfig::Sqlite(PathBuf::from(v.trim())),
        };

        let log_filter = lookup("RUST_LOG")
            .or_else(|| lookup("REGISTRY_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            bind_addr,
            storage,
            log_filter,
        })
    }
}
