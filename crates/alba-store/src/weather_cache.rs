//! Last weather reading and last known coordinates.
//!
//! A cached reading younger than the freshness window is served instead of
//! asking the proxy again.

use chrono::{DateTime, Utc};

use alba_shared::constants::{SLOT_COORDS, SLOT_WEATHER};
use alba_shared::weather::WeatherData;
use alba_shared::Coordinates;

use crate::error::{Result, StoreError};
use crate::slots::{read_json, write_json, SharedSlots};

pub struct WeatherCache {
    slots: SharedSlots,
}

impl WeatherCache {
    pub fn new(slots: SharedSlots) -> Self {
        Self { slots }
    }

    /// The cached reading, fresh or not.
    pub fn load(&self) -> Result<Option<WeatherData>> {
        self.read_lenient(SLOT_WEATHER)
    }

    /// The cached reading if it is still fresh at `now`.
    pub fn fresh_weather(&self, now: DateTime<Utc>) -> Result<Option<WeatherData>> {
        Ok(self.load()?.filter(|w| w.is_fresh_at(now)))
    }

    pub fn store_weather(&self, weather: &WeatherData) -> Result<()> {
        write_json(self.slots.as_ref(), SLOT_WEATHER, weather)?;
        tracing::debug!(city = %weather.city, "weather cached");
        Ok(())
    }

    /// Last known coordinates, or the default location.
    pub fn coords(&self) -> Result<Coordinates> {
        Ok(self
            .read_lenient::<Coordinates>(SLOT_COORDS)?
            .unwrap_or_default())
    }

    pub fn store_coords(&self, coords: Coordinates) -> Result<()> {
        write_json(self.slots.as_ref(), SLOT_COORDS, &coords)
    }

    fn read_lenient<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match read_json(self.slots.as_ref(), key) {
            Err(StoreError::Json(e)) => {
                tracing::warn!(slot = key, error = %e, "cached value unreadable, ignoring it");
                Ok(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::slots::{MemorySlots, SlotStorage};

    fn reading(at: DateTime<Utc>) -> WeatherData {
        WeatherData {
            temperature: 24,
            weathercode: 1,
            city: "Lisbon".into(),
            timestamp: at,
        }
    }

    #[test]
    fn test_freshness_window() {
        let cache = WeatherCache::new(MemorySlots::shared());
        let now = Utc::now();
        cache.store_weather(&reading(now - Duration::minutes(10))).unwrap();

        assert!(cache.fresh_weather(now).unwrap().is_some());
        assert!(cache
            .fresh_weather(now + Duration::minutes(25))
            .unwrap()
            .is_none());
        assert!(cache.load().unwrap().is_some());
    }

    #[test]
    fn test_default_coords() {
        let cache = WeatherCache::new(MemorySlots::shared());
        assert_eq!(cache.coords().unwrap(), Coordinates::default());

        let lisbon = Coordinates {
            latitude: 38.72,
            longitude: -9.14,
        };
        cache.store_coords(lisbon).unwrap();
        assert_eq!(cache.coords().unwrap(), lisbon);
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let slots = MemorySlots::shared();
        slots.write_slot(SLOT_WEATHER, "{").unwrap();
        slots.write_slot(SLOT_COORDS, "[]").unwrap();
        let cache = WeatherCache::new(slots);
        assert_eq!(cache.load().unwrap(), None);
        assert_eq!(cache.coords().unwrap(), Coordinates::default());
    }
}
