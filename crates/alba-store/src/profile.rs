//! The local user profile, kept in the `alba_profile` slot.

use chrono::Utc;

use alba_shared::constants::SLOT_PROFILE;

use crate::error::{Result, StoreError};
use crate::models::{Profile, ProfilePatch};
use crate::slots::{read_json, write_json, SharedSlots, SlotStorage};

pub struct ProfileStore {
    slots: SharedSlots,
}

impl ProfileStore {
    pub fn new(slots: SharedSlots) -> Self {
        Self { slots }
    }

    /// The stored profile. An unreadable payload is logged and reported as
    /// no profile at all.
    pub fn get(&self) -> Result<Option<Profile>> {
        match read_json(self.slots.as_ref(), SLOT_PROFILE) {
            Ok(profile) => Ok(profile),
            Err(StoreError::Json(e)) => {
                tracing::warn!(error = %e, "stored profile unreadable, ignoring it");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn set(&self, profile: &Profile) -> Result<()> {
        write_json(self.slots.as_ref(), SLOT_PROFILE, profile)?;
        tracing::debug!(profile_id = %profile.id, "profile saved");
        Ok(())
    }

    /// Merge `patch` into the stored profile and stamp `updatedAt`.
    pub fn update(&self, patch: ProfilePatch) -> Result<Profile> {
        let mut profile = self.get()?.ok_or_else(|| StoreError::NotFound {
            entity: "Profile",
            id: SLOT_PROFILE.to_string(),
        })?;

        if let Some(name) = patch.name {
            profile.name = name;
        }
        if let Some(photo) = patch.photo {
            profile.photo = photo;
        }
        if let Some(level) = patch.level {
            profile.level = level;
        }
        profile.updated_at = Some(Utc::now());

        self.set(&profile)?;
        Ok(profile)
    }

    pub fn clear(&self) -> Result<()> {
        self.slots.remove_slot(SLOT_PROFILE)
    }
}
