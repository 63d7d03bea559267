//! Application state shared by every command.
//!
//! [`AppState`] is the single composition root: it opens the slot backend
//! once and hands the same handle to every store, so nothing in the client
//! reaches for a global.

use std::sync::Arc;

use tokio::sync::broadcast;

use alba_store::{Database, MemorySlots, ProfileStore, SharedSlots, TeaStore, WeatherCache};

use crate::commands::weather::WeatherClient;
use crate::config::ClientConfig;
use crate::error::CommandError;
use crate::events::{AppEvent, EventSender, EVENT_CHANNEL_CAPACITY};

pub struct AppState {
    pub config: ClientConfig,

    /// Slot backend shared by the stores below.
    pub slots: SharedSlots,

    /// The persisted tea collection.
    pub teas: TeaStore,

    pub profile: ProfileStore,

    /// Last weather reading and location.
    pub weather_cache: WeatherCache,

    pub weather: WeatherClient,

    pub events: EventSender,
}

impl AppState {
    /// Open the on-disk database named by the configuration, or the one in
    /// the platform data directory.
    pub fn open(config: ClientConfig) -> Result<Self, CommandError> {
        let db = match &config.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        Self::with_slots(Arc::new(db), config)
    }

    /// A session that forgets everything when dropped.
    pub fn in_memory(config: ClientConfig) -> Result<Self, CommandError> {
        Self::with_slots(MemorySlots::shared(), config)
    }

    pub fn with_slots(slots: SharedSlots, config: ClientConfig) -> Result<Self, CommandError> {
        let weather = WeatherClient::new(&config.weather_url, config.weather_timeout)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            teas: TeaStore::with_slots(slots.clone()),
            profile: ProfileStore::new(slots.clone()),
            weather_cache: WeatherCache::new(slots.clone()),
            slots,
            weather,
            events,
            config,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }
}
