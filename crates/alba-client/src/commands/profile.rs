//! Profile commands.
//!
//! The profile comes from a JSON seed file when one is configured and from
//! the built-in default otherwise. Once shown it is kept in the profile slot
//! so edits survive a restart.

use std::path::Path;

use chrono::{TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use alba_shared::constants::{DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, DEFAULT_PROFILE_PHOTO};
use alba_shared::types::LevelInfo;
use alba_shared::ProfileLevel;
use alba_store::{Profile, ProfilePatch};

use crate::error::CommandError;
use crate::state::AppState;

/// The profile shown when no seed file is available.
pub fn default_profile() -> Profile {
    Profile {
        id: DEFAULT_PROFILE_ID.to_string(),
        name: DEFAULT_PROFILE_NAME.to_string(),
        photo: DEFAULT_PROFILE_PHOTO.to_string(),
        level: ProfileLevel::Beginner,
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).single(),
        updated_at: None,
    }
}

/// Load the profile with the given id, or whichever profile is available
/// when `id` is `None`.
pub fn load_profile(state: &AppState, id: Option<&str>) -> Result<Profile, CommandError> {
    let available = state
        .config
        .profile_path
        .as_deref()
        .and_then(read_seed)
        .unwrap_or_else(default_profile);

    if let Some(requested) = id {
        if requested != available.id {
            return Err(CommandError::NotFound(format!("Profile not found: {requested}")));
        }
    }

    if let Some(stored) = state.profile.get()?.filter(|p| p.id == available.id) {
        return Ok(stored);
    }

    state.profile.set(&available)?;
    debug!(profile_id = %available.id, "profile loaded");
    Ok(available)
}

/// What the profile page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile: Profile,
    pub level: LevelInfo,
    pub completion: u8,
}

pub fn profile_view(state: &AppState, id: Option<&str>) -> Result<ProfileView, CommandError> {
    let profile = load_profile(state, id)?;
    Ok(ProfileView {
        level: profile.level.info(),
        completion: profile.completion_percentage(),
        profile,
    })
}

pub fn update_profile(state: &AppState, patch: ProfilePatch) -> Result<Profile, CommandError> {
    Ok(state.profile.update(patch)?)
}

fn read_seed(path: &Path) -> Option<Profile> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "profile seed unreadable");
            return None;
        }
    };

    match serde_json::from_str::<Profile>(&raw) {
        Ok(mut profile) => {
            if profile.created_at.is_none() {
                profile.created_at = default_profile().created_at;
            }
            Some(profile)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "profile seed malformed");
            None
        }
    }
}
