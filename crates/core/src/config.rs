//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS};
use crate::{StoreError, StoreResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_url: String,
    max_connections: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(database_url: String, max_connections: u32) -> StoreResult<Self> {
        if database_url.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "database_url cannot be empty".into(),
            ));
        }
        if max_connections == 0 {
            return Err(StoreError::InvalidInput(
                "max_connections must be at least 1".into(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Build the configuration from `DATABASE_URL` and `HIS_DB_MAX_CONNECTIONS`.
    ///
    /// Intended to be called once from a binary's `main`.
    pub fn from_env() -> StoreResult<Self> {
        let database_url = database_url_from_env_value(std::env::var("DATABASE_URL").ok());
        let max_connections =
            max_connections_from_env_value(std::env::var("HIS_DB_MAX_CONNECTIONS").ok())?;
        Self::new(database_url, max_connections)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

/// Resolve the database URL from an optional value, falling back to the default.
pub fn database_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Parse the pool size from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default.
pub fn max_connections_from_env_value(value: Option<String>) -> StoreResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_MAX_CONNECTIONS),
        Some(v) => v.parse::<u32>().map_err(|_| {
            StoreError::InvalidInput(format!(
                "HIS_DB_MAX_CONNECTIONS must be a positive integer, got '{}'",
                v
            ))
        }),
    }
}
