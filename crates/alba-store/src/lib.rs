//! # alba-store
//!
//! Local storage for the Alba tea closet. Every piece of state lives in a
//! named JSON slot, backed by SQLite through [`Database`] or kept in memory
//! by [`MemorySlots`]. On top of the slots sit the persisted tea collection
//! ([`TeaStore`]), the profile and the weather cache, plus the pure filter
//! and aggregation engine used to derive the closet view.

pub mod database;
pub mod filter;
pub mod migrations;
pub mod models;
pub mod profile;
pub mod slots;
pub mod teas;
pub mod weather_cache;

mod error;

pub use database::Database;
pub use error::{PersistenceError, Result, StoreError};
pub use filter::{apply_filter, FilterCounts, FilterView};
pub use models::*;
pub use profile::ProfileStore;
pub use slots::{MemorySlots, SharedSlots, SlotStorage};
pub use teas::{Mutation, SlotPersistence, TeaPersistence, TeaStore};
pub use weather_cache::WeatherCache;
