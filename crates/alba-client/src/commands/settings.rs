use serde::{Deserialize, Serialize};
use tracing::info;

use alba_shared::constants::SLOT_PREFERENCES;
use alba_shared::TeaFilter;
use alba_store::slots::{read_json, write_json};

use crate::error::CommandError;
use crate::state::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Show the most recently added teas first.
    pub newest_first: bool,
    /// Filter used when the closet is opened without a `type` query.
    pub default_filter: TeaFilter,
}

/// Saved preferences. Missing or unreadable preferences yield the defaults.
pub fn get_settings(state: &AppState) -> AppSettings {
    match read_json::<AppSettings>(state.slots.as_ref(), SLOT_PREFERENCES) {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "preferences unreadable, using defaults");
            AppSettings::default()
        }
    }
}

pub fn update_settings(state: &AppState, settings: &AppSettings) -> Result<(), CommandError> {
    write_json(state.slots.as_ref(), SLOT_PREFERENCES, settings)?;
    info!(
        newest_first = settings.newest_first,
        default_filter = %settings.default_filter,
        "Settings updated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use alba_shared::TeaType;
    use alba_store::SlotStorage;

    use super::*;
    use crate::commands::teas::{closet_view, create_tea};
    use crate::config::ClientConfig;

    fn state() -> AppState {
        AppState::in_memory(ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let state = state();
        assert_eq!(get_settings(&state), AppSettings::default());
        assert_eq!(AppSettings::default().default_filter, TeaFilter::All);
    }

    #[test]
    fn test_round_trip_wire_shape() {
        let state = state();
        let settings = AppSettings {
            newest_first: true,
            default_filter: TeaFilter::Favorite,
        };
        update_settings(&state, &settings).unwrap();
        assert_eq!(get_settings(&state), settings);

        let raw = state.slots.read_slot(SLOT_PREFERENCES).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({ "newestFirst": true, "defaultFilter": "favorite" }));
    }

    #[test]
    fn test_corrupt_preferences_fall_back() {
        let state = state();
        state.slots.write_slot(SLOT_PREFERENCES, "{\"defaultFilter\": 3}").unwrap();
        assert_eq!(get_settings(&state), AppSettings::default());
    }

    #[test]
    fn test_settings_shape_closet() {
        let mut state = state();
        for (name, tea_type) in [("First", "black"), ("Second", "white")] {
            create_tea(
                &mut state,
                json!({ "name": name, "type": tea_type }).as_object().unwrap(),
            )
            .unwrap()
            .into_value();
        }

        update_settings(
            &state,
            &AppSettings {
                newest_first: true,
                default_filter: TeaFilter::All,
            },
        )
        .unwrap();
        let view = closet_view(&state, None);
        assert_eq!(view.teas[0].name, "Second");

        update_settings(
            &state,
            &AppSettings {
                newest_first: false,
                default_filter: TeaFilter::Type(TeaType::White),
            },
        )
        .unwrap();
        let view = closet_view(&state, None);
        assert_eq!(view.teas.len(), 1);
        assert_eq!(view.teas[0].name, "Second");
    }
}
