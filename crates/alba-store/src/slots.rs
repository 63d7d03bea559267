//! Durable key/value slots.
//!
//! Every piece of client state (tea collection, profile, preferences,
//! weather cache) lives in one named slot holding a JSON document. The
//! [`SlotStorage`] trait is the persistence seam: [`Database`](crate::Database)
//! implements it on SQLite, [`MemorySlots`] in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

pub trait SlotStorage: Send + Sync {
    /// Raw slot contents, or `None` when the slot was never written.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    fn write_slot(&self, key: &str, value: &str) -> Result<()>;

    fn remove_slot(&self, key: &str) -> Result<()>;
}

/// Slot backend shared by every store in one session.
pub type SharedSlots = Arc<dyn SlotStorage>;

pub fn read_json<T: DeserializeOwned>(slots: &dyn SlotStorage, key: &str) -> Result<Option<T>> {
    match slots.read_slot(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize + ?Sized>(slots: &dyn SlotStorage, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    slots.write_slot(key, &raw)
}

/// In-memory slots, optionally with a byte quota across all slots.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes that would push the total stored bytes past `limit` fail with
    /// [`StoreError::QuotaExceeded`] and leave the slot untouched.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            quota: Some(limit),
        }
    }

    pub fn shared() -> SharedSlots {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotStorage for MemorySlots {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.lock();
        if let Some(limit) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
