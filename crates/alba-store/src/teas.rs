//! The persisted tea collection.
//!
//! [`TeaStore`] owns the canonical ordered list of teas. It rehydrates once
//! from its [`TeaPersistence`] adapter when opened and writes the whole
//! collection back after every mutation. A failed write never rolls back the
//! in-memory change: the mutation is returned together with the
//! [`PersistenceError`] so the caller can warn that it may not survive a
//! reload.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use alba_shared::constants::{SLOT_TEAS, TEAS_SCHEMA_VERSION};
use alba_shared::ids::new_entity_id;
use alba_shared::{TeaId, TeaType};

use crate::error::{PersistenceError, Result, StoreError};
use crate::models::{NewTea, Tea, TeaPatch};
use crate::slots::{SharedSlots, SlotStorage};

// ---------------------------------------------------------------------------
// Persistence adapter
// ---------------------------------------------------------------------------

pub trait TeaPersistence: Send + Sync {
    /// Stored collection. Missing or unrecognised data yields an empty list;
    /// an `Err` means the stored payload could not be read at all.
    fn load(&self) -> Result<Vec<Tea>>;

    fn save(&self, teas: &[Tea]) -> Result<()>;

    /// Name used in logs and in [`PersistenceError`].
    fn location(&self) -> &str {
        SLOT_TEAS
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    teas: &'a [Tea],
}

#[derive(Deserialize)]
struct Envelope {
    teas: Vec<Tea>,
}

/// Stores the collection as `{"version": 1, "teas": [...]}` in one slot.
pub struct SlotPersistence {
    slots: SharedSlots,
    key: String,
}

impl SlotPersistence {
    pub fn new(slots: SharedSlots) -> Self {
        Self::with_key(slots, SLOT_TEAS)
    }

    pub fn with_key(slots: SharedSlots, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }
}

impl TeaPersistence for SlotPersistence {
    fn load(&self) -> Result<Vec<Tea>> {
        let Some(raw) = self.slots.read_slot(&self.key)? else {
            return Ok(Vec::new());
        };

        let value: Value = serde_json::from_str(&raw)?;
        let version = value.get("version").and_then(Value::as_u64);
        if version != Some(u64::from(TEAS_SCHEMA_VERSION)) {
            tracing::warn!(
                slot = %self.key,
                found = ?version,
                expected = TEAS_SCHEMA_VERSION,
                "unrecognised tea collection version, starting empty"
            );
            return Ok(Vec::new());
        }

        let envelope: Envelope = serde_json::from_value(value)?;
        Ok(envelope.teas)
    }

    fn save(&self, teas: &[Tea]) -> Result<()> {
        let raw = serde_json::to_string(&EnvelopeRef {
            version: TEAS_SCHEMA_VERSION,
            teas,
        })?;
        self.slots.write_slot(&self.key, &raw)
    }

    fn location(&self) -> &str {
        &self.key
    }
}

// ---------------------------------------------------------------------------
// Mutation outcome
// ---------------------------------------------------------------------------

/// Outcome of a store mutation: the in-memory result, plus the write-back
/// failure if persisting it did not succeed.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Mutation<T> {
    pub value: T,
    pub persist_error: Option<PersistenceError>,
}

impl<T> Mutation<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Drop the persistence status and keep the in-memory result.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Treat a failed write-back as an error.
    pub fn into_result(self) -> Result<T> {
        match self.persist_error {
            None => Ok(self.value),
            Some(err) => Err(err.into()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        Mutation {
            value: f(self.value),
            persist_error: self.persist_error,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct TeaStore {
    teas: Vec<Tea>,
    persistence: Box<dyn TeaPersistence>,
    degraded: bool,
}

impl std::fmt::Debug for TeaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeaStore")
            .field("teas", &self.teas.len())
            .field("location", &self.persistence.location())
            .field("degraded", &self.degraded)
            .finish()
    }
}

impl TeaStore {
    /// Rehydrate from `persistence`. Unreadable data is logged and treated
    /// as an empty collection.
    pub fn open(persistence: impl TeaPersistence + 'static) -> Self {
        let teas = match persistence.load() {
            Ok(teas) => dedupe(teas),
            Err(e) => {
                tracing::warn!(
                    location = persistence.location(),
                    error = %e,
                    "stored tea collection unreadable, starting empty"
                );
                Vec::new()
            }
        };

        tracing::info!(count = teas.len(), "tea collection loaded");

        Self {
            teas,
            persistence: Box::new(persistence),
            degraded: false,
        }
    }

    /// Open the collection kept in the standard `alba_teas` slot.
    pub fn with_slots(slots: SharedSlots) -> Self {
        Self::open(SlotPersistence::new(slots))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Append a new tea. The store assigns its id and timestamps.
    pub fn add(&mut self, new: NewTea) -> Result<Mutation<Tea>> {
        let tea_type = new
            .tea_type
            .ok_or_else(|| StoreError::Validation("tea type is required".into()))?;
        let name = require_name(&new.name)?;

        let now = Utc::now();
        let tea = Tea {
            id: new_entity_id(),
            name,
            tea_type,
            description: new.description,
            tasting_notes: new.tasting_notes,
            infusion_ingredients: new.infusion_ingredients,
            brew_time: new.brew_time,
            favorite: new.favorite,
            image: new.image,
            created_at: now,
            updated_at: now,
        };

        tracing::debug!(tea_id = %tea.id, tea_type = %tea.tea_type, "tea added");

        self.teas.push(tea.clone());
        Ok(Mutation {
            value: tea,
            persist_error: self.persist(),
        })
    }

    /// Merge `patch` into an existing tea and bump its `updated_at`.
    pub fn update(&mut self, id: TeaId, patch: TeaPatch) -> Result<Mutation<Tea>> {
        if let Some(name) = &patch.name {
            require_name(name)?;
        }

        let tea = self.find_mut(id)?;
        let mut patch = patch;
        if let Some(name) = patch.name.take() {
            patch.name = Some(name.trim().to_string());
        }
        tea.apply(patch);
        tea.updated_at = next_stamp(tea.updated_at);
        let updated = tea.clone();

        tracing::debug!(tea_id = %id, "tea updated");

        Ok(Mutation {
            value: updated,
            persist_error: self.persist(),
        })
    }

    /// Flip the favorite flag.
    pub fn toggle_favorite(&mut self, id: TeaId) -> Result<Mutation<Tea>> {
        let tea = self.find_mut(id)?;
        tea.favorite = !tea.favorite;
        tea.updated_at = next_stamp(tea.updated_at);
        let updated = tea.clone();

        tracing::debug!(tea_id = %id, favorite = updated.favorite, "favorite toggled");

        Ok(Mutation {
            value: updated,
            persist_error: self.persist(),
        })
    }

    /// Remove a tea. Unknown ids are a no-op that returns `None` and does
    /// not touch storage.
    pub fn remove(&mut self, id: TeaId) -> Mutation<Option<Tea>> {
        let Some(index) = self.teas.iter().position(|t| t.id == id) else {
            return Mutation {
                value: None,
                persist_error: None,
            };
        };

        let removed = self.teas.remove(index);
        tracing::debug!(tea_id = %id, "tea removed");

        Mutation {
            value: Some(removed),
            persist_error: self.persist(),
        }
    }

    /// Empty the whole collection. Returns how many teas were dropped.
    pub fn clear_all(&mut self) -> Mutation<usize> {
        let dropped = self.teas.len();
        self.teas.clear();

        tracing::info!(dropped, "tea collection cleared");

        Mutation {
            value: dropped,
            persist_error: self.persist(),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn get(&self, id: TeaId) -> Option<&Tea> {
        self.teas.iter().find(|t| t.id == id)
    }

    /// All teas in insertion order.
    pub fn list(&self) -> &[Tea] {
        &self.teas
    }

    pub fn list_by_type(&self, tea_type: TeaType) -> Vec<&Tea> {
        self.teas.iter().filter(|t| t.tea_type == tea_type).collect()
    }

    pub fn list_favorites(&self) -> Vec<&Tea> {
        self.teas.iter().filter(|t| t.favorite).collect()
    }

    pub fn count(&self) -> usize {
        self.teas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teas.is_empty()
    }

    /// Whether the most recent write-back failed. Cleared by the next
    /// successful write.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn find_mut(&mut self, id: TeaId) -> Result<&mut Tea> {
        self.teas
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::tea_not_found(id))
    }

    fn persist(&mut self) -> Option<PersistenceError> {
        match self.persistence.save(&self.teas) {
            Ok(()) => {
                if self.degraded {
                    tracing::info!("tea collection persisted again");
                }
                self.degraded = false;
                None
            }
            Err(e) => {
                let err = PersistenceError::new(self.persistence.location(), &e);
                tracing::warn!(error = %err, "changes may not survive a reload");
                self.degraded = true;
                Some(err)
            }
        }
    }
}

fn require_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("tea name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// A fresh timestamp strictly after `previous`, even within one clock tick.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Keep the first occurrence of every id.
fn dedupe(teas: Vec<Tea>) -> Vec<Tea> {
    let mut seen = HashSet::new();
    let before = teas.len();
    let unique: Vec<Tea> = teas.into_iter().filter(|t| seen.insert(t.id)).collect();
    if unique.len() != before {
        tracing::warn!(
            dropped = before - unique.len(),
            "duplicate tea ids in stored collection"
        );
    }
    unique
}
