//! Server configuration loaded from environment variables.
//!
//! All settings have defaults pointing at the public upstream services so
//! the proxy can start with zero configuration for local development.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Open-Meteo forecast endpoint.
    /// Env: `OPEN_METEO_URL`
    pub open_meteo_url: String,

    /// Nominatim reverse geocoding endpoint.
    /// Env: `NOMINATIM_URL`
    pub nominatim_url: String,

    /// Per-request timeout for both upstream calls.
    /// Env: `UPSTREAM_TIMEOUT_SECS`
    /// Default: `10`
    pub upstream_timeout: Duration,

    /// Sent with every upstream request. Nominatim rejects anonymous clients.
    /// Env: `USER_AGENT`
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            open_meteo_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            upstream_timeout: Duration::from_secs(10),
            user_agent: format!("alba-weather-proxy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(url) = var("OPEN_METEO_URL").filter(|u| !u.is_empty()) {
            config.open_meteo_url = url;
        }

        if let Some(url) = var("NOMINATIM_URL").filter(|u| !u.is_empty()) {
            config.nominatim_url = url;
        }

        if let Some(val) = var("UPSTREAM_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.upstream_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid UPSTREAM_TIMEOUT_SECS, using default"),
            }
        }

        if let Some(agent) = var("USER_AGENT").filter(|a| !a.is_empty()) {
            config.user_agent = agent;
        }

        config
    }
}
