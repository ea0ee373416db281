//! REST server configuration, resolved once at startup.

use axum::http::HeaderValue;

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    rest_addr: String,
    cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn new(rest_addr: String, cors_origins: Vec<HeaderValue>) -> Self {
        Self {
            rest_addr,
            cors_origins,
        }
    }

    /// Build the configuration from `HIS_REST_ADDR` and `HIS_CORS_ORIGINS`.
    pub fn from_env() -> anyhow::Result<Self> {
        let rest_addr = rest_addr_from_env_value(std::env::var("HIS_REST_ADDR").ok());
        let cors_origins = cors_origins_from_env_value(std::env::var("HIS_CORS_ORIGINS").ok())?;
        Ok(Self::new(rest_addr, cors_origins))
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn cors_origins(&self) -> &[HeaderValue] {
        &self.cors_origins
    }
}

pub fn rest_addr_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_REST_ADDR.to_string())
}

/// Parse a comma-separated origin list.
///
/// Blank entries are skipped. A missing or blank value yields the default origin.
pub fn cors_origins_from_env_value(value: Option<String>) -> anyhow::Result<Vec<HeaderValue>> {
    let raw = value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());

    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| anyhow::anyhow!("invalid CORS origin '{}': {}", origin, e))
        })
        .collect()
}
