//! # alba-server
//!
//! Weather proxy for the Alba tea closet.
//!
//! This binary provides:
//! - **`GET /api/weather?lat=&lon=`**: current conditions from Open-Meteo
//!   merged with the place name from Nominatim
//! - **`GET /health`**: liveness probe

mod api;
mod config;
mod error;
mod upstream;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::upstream::Upstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,alba_server=debug")),
        )
        .init();

    info!("Starting Alba weather proxy v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    let upstream = Upstream::new(&config)?;
    let app_state = AppState {
        upstream: Arc::new(upstream),
    };

    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
