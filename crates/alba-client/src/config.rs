//! Client configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// SQLite file holding every slot.
    /// Env: `ALBA_DB_PATH`
    /// Default: `None`, meaning the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Base URL of the weather proxy.
    /// Env: `ALBA_WEATHER_URL`
    /// Default: `http://localhost:8080`
    pub weather_url: String,

    /// Env: `ALBA_WEATHER_TIMEOUT_SECS`
    /// Default: `10`
    pub weather_timeout: Duration,

    /// JSON file with the profile to show.
    /// Env: `ALBA_PROFILE_PATH`
    pub profile_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            weather_url: "http://localhost:8080".to_string(),
            weather_timeout: Duration::from_secs(10),
            profile_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = var("ALBA_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(url) = var("ALBA_WEATHER_URL") {
            if url.starts_with("http://") || url.starts_with("https://") {
                config.weather_url = url.trim_end_matches('/').to_string();
            } else {
                tracing::warn!(value = %url, "Invalid ALBA_WEATHER_URL, using default");
            }
        }

        if let Some(val) = var("ALBA_WEATHER_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.weather_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid ALBA_WEATHER_TIMEOUT_SECS, using default"),
            }
        }

        if let Some(path) = var("ALBA_PROFILE_PATH").filter(|p| !p.is_empty()) {
            config.profile_path = Some(PathBuf::from(path));
        }

        config
    }
}
