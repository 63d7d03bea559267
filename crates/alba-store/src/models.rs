//! Domain model structs persisted in the local slots.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so it can be handed directly to the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use alba_shared::{ProfileLevel, TeaId, TeaType};

// ---------------------------------------------------------------------------
// Tea
// ---------------------------------------------------------------------------

/// One entry of the tea collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tea {
    /// Assigned by the store at creation, never changes.
    pub id: TeaId,
    pub name: String,
    #[serde(rename = "type")]
    pub tea_type: TeaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasting_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infusion_ingredients: Option<String>,
    /// Minutes, 0 to 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brew_time: Option<u32>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tea {
    /// The tea's own image, or the default picture for its type.
    pub fn image_or_default(&self) -> &str {
        self.image
            .as_deref()
            .unwrap_or_else(|| self.tea_type.default_image())
    }

    /// Shallow merge: fields absent from the patch keep their value.
    pub fn apply(&mut self, patch: TeaPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(tea_type) = patch.tea_type {
            self.tea_type = tea_type;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tasting_notes) = patch.tasting_notes {
            self.tasting_notes = tasting_notes;
        }
        if let Some(infusion_ingredients) = patch.infusion_ingredients {
            self.infusion_ingredients = infusion_ingredients;
        }
        if let Some(brew_time) = patch.brew_time {
            self.brew_time = brew_time;
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

/// Caller-supplied fields for a new tea. Identity and timestamps are added
/// by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTea {
    #[serde(default)]
    pub name: String,
    /// Optional here so a missing type can be reported instead of guessed.
    #[serde(rename = "type", default)]
    pub tea_type: Option<TeaType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tasting_notes: Option<String>,
    #[serde(default)]
    pub infusion_ingredients: Option<String>,
    #[serde(default)]
    pub brew_time: Option<u32>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewTea {
    pub fn new(name: impl Into<String>, tea_type: TeaType) -> Self {
        Self {
            name: name.into(),
            tea_type: Some(tea_type),
            ..Self::default()
        }
    }
}

/// Partial update. For optional fields the outer `Option` means "touch this
/// field" and the inner one is the new value, so `Some(None)` clears it.
/// In JSON an absent key leaves the field alone and `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tea_type: Option<TeaType>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tasting_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub infusion_ingredients: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub brew_time: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
}

impl TeaPatch {
    pub fn description(text: impl Into<String>) -> Self {
        Self {
            description: Some(Some(text.into())),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A key that is present deserializes to `Some`, even when its value is null.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The single local user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// Photo URI.
    pub photo: String,
    pub level: ProfileLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Share of the name/photo/level fields that are filled in, in percent.
    pub fn completion_percentage(&self) -> u8 {
        // The level is an enum and therefore always set.
        let filled = [!self.name.trim().is_empty(), !self.photo.trim().is_empty(), true]
            .into_iter()
            .filter(|filled| *filled)
            .count();
        ((filled as f64 / 3.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ProfileLevel>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Tea {
        let now = Utc::now();
        Tea {
            id: TeaId::new(),
            name: "Earl Grey".into(),
            tea_type: TeaType::Black,
            description: Some("Bergamot".into()),
            tasting_notes: None,
            infusion_ingredients: None,
            brew_time: Some(4),
            favorite: false,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_tea_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], json!("black"));
        assert_eq!(value["brewTime"], json!(4));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("tastingNotes").is_none());
    }

    #[test]
    fn test_default_image_by_type() {
        let mut tea = sample();
        assert_eq!(tea.image_or_default(), "/images/teas/black_tea.png");
        tea.image = Some("https://example.com/t.png".into());
        assert_eq!(tea.image_or_default(), "https://example.com/t.png");
    }

    #[test]
    fn test_patch_absent_vs_null() {
        let patch: TeaPatch = serde_json::from_value(json!({ "tastingNotes": "malty" })).unwrap();
        let mut tea = sample();
        tea.apply(patch);
        assert_eq!(tea.tasting_notes.as_deref(), Some("malty"));
        assert_eq!(tea.description.as_deref(), Some("Bergamot"));

        let patch: TeaPatch = serde_json::from_value(json!({ "description": null })).unwrap();
        tea.apply(patch);
        assert_eq!(tea.description, None);
        assert_eq!(tea.brew_time, Some(4));
    }

    #[test]
    fn test_patch_ignores_identity_fields() {
        let before = sample();
        let patch: TeaPatch = serde_json::from_value(json!({
            "id": TeaId::new(),
            "createdAt": "2000-01-01T00:00:00Z",
        }))
        .unwrap();
        assert!(patch.is_empty());
        let mut tea = before.clone();
        tea.apply(patch);
        assert_eq!(tea, before);
    }

    #[test]
    fn test_new_tea_without_type_deserializes() {
        let new: NewTea = serde_json::from_value(json!({ "name": "Mystery" })).unwrap();
        assert_eq!(new.tea_type, None);
        assert!(!new.favorite);
    }

    #[test]
    fn test_profile_completion() {
        let mut profile = Profile {
            id: "lucca".into(),
            name: "Tea Lover".into(),
            photo: "/p.png".into(),
            level: ProfileLevel::Beginner,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(profile.completion_percentage(), 100);
        profile.photo.clear();
        assert_eq!(profile.completion_percentage(), 67);
        profile.name = " ".into();
        assert_eq!(profile.completion_percentage(), 33);
    }
}
