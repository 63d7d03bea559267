//! # alba-client
//!
//! Application layer of the Alba tea closet: the [`AppState`] composition
//! root, the commands the presentation layer invokes, the navigation and
//! modal coordinator, and the event channel that announces changes.

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod navigation;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::{CommandError, WeatherError};
pub use events::AppEvent;
pub use state::AppState;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("alba_client=debug,alba_store=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Set up logging and open the state described by the environment.
pub fn start() -> Result<AppState, CommandError> {
    init_tracing();

    let config = ClientConfig::from_env();
    tracing::info!(?config, "Starting Alba client");

    let state = AppState::open(config)?;
    tracing::info!(teas = state.teas.count(), "Alba client ready");
    Ok(state)
}
