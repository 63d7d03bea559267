//! Navigation and modal coordination.
//!
//! [`Intent`] is what the user wants to do; [`Intent::path`] turns it into
//! the path the router should show and [`Route::parse`] turns a path back
//! into an intent. [`resolve`] combines a path with the store and the
//! current [`Viewport`] to decide what to render: a full page, an overlay,
//! or the not-found recovery view.

use std::collections::BTreeSet;

use serde::Serialize;

use alba_shared::constants::BREAKPOINT_DESKTOP;
use alba_shared::{TeaFilter, TeaId};
use alba_store::Tea;

use crate::commands::teas::clear_collection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Intents and paths
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The collection, optionally narrowed to one filter.
    Closet(TeaFilter),
    ViewTea(TeaId),
    EditTea(TeaId),
    DeleteTea(TeaId),
    CreateTea,
    Profile(String),
    Discover,
    Rituals,
}

impl Intent {
    pub fn path(&self) -> String {
        match self {
            Intent::Closet(TeaFilter::All) => "/closet".to_string(),
            Intent::Closet(filter) => format!("/closet?type={filter}"),
            Intent::ViewTea(id) => format!("/closet/tea/{id}"),
            Intent::EditTea(id) => format!("/closet/tea/{id}/edit"),
            Intent::DeleteTea(id) => format!("/closet/tea/{id}/delete"),
            Intent::CreateTea => "/closet/tea/new".to_string(),
            Intent::Profile(id) => format!("/profile/{}", urlencoding::encode(id)),
            Intent::Discover => "/discover".to_string(),
            Intent::Rituals => "/rituals".to_string(),
        }
    }

    /// Edit, delete and create are secondary actions that may float over
    /// the current page.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            Intent::EditTea(_) | Intent::DeleteTea(_) | Intent::CreateTea
        )
    }

    pub fn tea_id(&self) -> Option<TeaId> {
        match self {
            Intent::ViewTea(id) | Intent::EditTea(id) | Intent::DeleteTea(id) => Some(*id),
            _ => None,
        }
    }
}

/// A parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Known(Intent),
    /// A tea path whose id segment is not a tea id.
    MalformedTea(String),
}

impl Route {
    /// Parse a path produced by [`Intent::path`]. Returns `None` for paths
    /// outside the app.
    pub fn parse(path: &str) -> Option<Route> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = path
            .trim_end_matches('/')
            .split('/')
            .skip(1)
            .collect();

        let intent = match segments.as_slice() {
            ["closet"] => Intent::Closet(TeaFilter::from_query(query_param(query, "type"))),
            ["closet", "tea", "new"] => Intent::CreateTea,
            ["closet", "tea", id, rest @ ..] => {
                let Ok(id) = id.parse::<TeaId>() else {
                    return match rest {
                        [] | ["edit"] | ["delete"] => Some(Route::MalformedTea(id.to_string())),
                        _ => None,
                    };
                };
                match rest {
                    [] => Intent::ViewTea(id),
                    ["edit"] => Intent::EditTea(id),
                    ["delete"] => Intent::DeleteTea(id),
                    _ => return None,
                }
            }
            ["profile", id] if !id.is_empty() => {
                Intent::Profile(urlencoding::decode(id).ok()?.into_owned())
            }
            ["discover"] => Intent::Discover,
            ["rituals"] => Intent::Rituals,
            _ => return None,
        };
        Some(Route::Known(intent))
    }
}

fn query_param<'a>(query: Option<&'a str>, key: &str) -> Option<&'a str> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

// ---------------------------------------------------------------------------
// Presentation mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Wide,
    Narrow,
}

impl Viewport {
    pub fn from_width(width: u32) -> Self {
        if width >= BREAKPOINT_DESKTOP {
            Viewport::Wide
        } else {
            Viewport::Narrow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Navigate to a dedicated page.
    Page,
    /// Render over the current page, keeping its state.
    Overlay,
}

/// Recomputed on every call; the viewport may change between renders.
pub fn presentation_mode(intent: &Intent, viewport: Viewport) -> PresentationMode {
    if viewport == Viewport::Wide && intent.is_secondary() {
        PresentationMode::Overlay
    } else {
        PresentationMode::Page
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Shown instead of a tea page when the tea does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundView {
    pub tea_id: String,
    pub message: String,
    pub available_teas: usize,
    /// Offer to wipe local data, for when the stored collection is gone.
    pub can_clear_data: bool,
}

impl NotFoundView {
    pub fn actions(&self) -> Vec<RecoveryAction> {
        let mut actions = vec![RecoveryAction::Back];
        if self.can_clear_data {
            actions.push(RecoveryAction::ClearData);
        }
        actions
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Render {
        intent: Intent,
        mode: PresentationMode,
        /// The tea the intent refers to, if any.
        tea: Option<Tea>,
    },
    NotFound(NotFoundView),
}

/// Resolve `path` against the store. `None` for paths outside the app.
pub fn resolve(state: &AppState, path: &str, viewport: Viewport) -> Option<Resolution> {
    match Route::parse(path)? {
        Route::Known(intent) => Some(resolve_intent(state, intent, viewport)),
        Route::MalformedTea(raw) => Some(not_found(state, raw)),
    }
}

pub fn resolve_intent(state: &AppState, intent: Intent, viewport: Viewport) -> Resolution {
    let tea = match intent.tea_id() {
        Some(id) => match state.teas.get(id) {
            Some(tea) => Some(tea.clone()),
            None => return not_found(state, id.to_string()),
        },
        None => None,
    };

    Resolution::Render {
        mode: presentation_mode(&intent, viewport),
        intent,
        tea,
    }
}

fn not_found(state: &AppState, tea_id: String) -> Resolution {
    let available = state.teas.count();
    tracing::debug!(tea_id = %tea_id, available, "tea not found");
    Resolution::NotFound(NotFoundView {
        tea_id,
        message: "Tea not found".to_string(),
        available_teas: available,
        can_clear_data: available == 0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecoveryAction {
    Back,
    ClearData,
}

/// Carry out a recovery action and return the path to go to next.
pub fn recover(state: &mut AppState, action: RecoveryAction) -> String {
    if action == RecoveryAction::ClearData {
        let outcome = clear_collection(state);
        if let Some(err) = outcome.persist_error {
            tracing::warn!(error = %err, "clearing local data was not persisted");
        }
    }
    Intent::Closet(TeaFilter::All).path()
}

// ---------------------------------------------------------------------------
// Profile menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Soon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
    /// May contain `{profileId}`.
    pub href: &'static str,
    pub badge: Option<Badge>,
    pub match_pattern: Option<&'static str>,
    pub exact: bool,
}

pub const PROFILE_MENU_ITEMS: [MenuItem; 4] = [
    MenuItem {
        id: "profile",
        label: "My Profile",
        href: "/profile/{profileId}",
        badge: None,
        match_pattern: Some("/profile/"),
        exact: false,
    },
    MenuItem {
        id: "collection",
        label: "My Tea Collection",
        href: "/closet",
        badge: None,
        match_pattern: Some("/closet"),
        exact: false,
    },
    MenuItem {
        id: "discover",
        label: "Discover Teas",
        href: "/discover",
        badge: Some(Badge::Soon),
        match_pattern: None,
        exact: true,
    },
    MenuItem {
        id: "rituals",
        label: "Tea Rituals",
        href: "/rituals",
        badge: Some(Badge::Soon),
        match_pattern: None,
        exact: true,
    },
];

impl MenuItem {
    pub fn resolve_href(&self, profile_id: &str) -> String {
        self.href.replace("{profileId}", &urlencoding::encode(profile_id))
    }

    pub fn is_active(&self, current_path: &str, profile_id: &str) -> bool {
        let href = self.resolve_href(profile_id);
        if self.exact {
            return current_path == href;
        }
        match self.match_pattern {
            Some(pattern) => current_path.starts_with(pattern),
            None => current_path.starts_with(&href),
        }
    }

    /// Where clicking the item goes. Items marked "soon" go nowhere.
    pub fn target(&self, profile_id: &str) -> Option<String> {
        match self.badge {
            Some(Badge::Soon) => None,
            _ => Some(self.resolve_href(profile_id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub badge: Option<Badge>,
    pub resolved_href: String,
    pub is_active: bool,
}

pub fn profile_menu(profile_id: &str, current_path: &str) -> Vec<MenuEntry> {
    PROFILE_MENU_ITEMS
        .iter()
        .map(|item| MenuEntry {
            id: item.id,
            label: item.label,
            badge: item.badge,
            resolved_href: item.resolve_href(profile_id),
            is_active: item.is_active(current_path, profile_id),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

/// Which named overlays are open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalRegistry {
    open: BTreeSet<String>,
}

impl ModalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, id: impl Into<String>) {
        self.open.insert(id.into());
    }

    pub fn close(&mut self, id: &str) {
        self.open.remove(id);
    }

    /// Returns whether the modal is open afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.open.remove(id) {
            false
        } else {
            self.open.insert(id.to_string());
            true
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    pub fn close_all(&mut self) {
        self.open.clear();
    }

    pub fn open_ids(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use alba_shared::TeaType;

    use super::*;
    use crate::commands::teas::create_tea;
    use crate::config::ClientConfig;

    fn state_with_tea() -> (AppState, TeaId) {
        let mut state = AppState::in_memory(ClientConfig::default()).unwrap();
        let tea = create_tea(
            &mut state,
            json!({ "name": "Bai Mudan", "type": "white" }).as_object().unwrap(),
        )
        .unwrap()
        .into_value();
        (state, tea.id)
    }

    #[test]
    fn test_paths() {
        let id = TeaId::new();
        assert_eq!(Intent::Closet(TeaFilter::All).path(), "/closet");
        assert_eq!(
            Intent::Closet(TeaFilter::Type(TeaType::Puerh)).path(),
            "/closet?type=puerh"
        );
        assert_eq!(Intent::Closet(TeaFilter::Favorite).path(), "/closet?type=favorite");
        assert_eq!(Intent::EditTea(id).path(), format!("/closet/tea/{id}/edit"));
        assert_eq!(Intent::CreateTea.path(), "/closet/tea/new");
        assert_eq!(Intent::Profile("lucca".into()).path(), "/profile/lucca");
    }

    #[test]
    fn test_parse_inverts_path() {
        let id = TeaId::new();
        let mut intents = vec![
            Intent::ViewTea(id),
            Intent::EditTea(id),
            Intent::DeleteTea(id),
            Intent::CreateTea,
            Intent::Profile("lucca".into()),
            Intent::Discover,
            Intent::Rituals,
        ];
        intents.extend(TeaFilter::ALL.into_iter().map(Intent::Closet));

        let mut paths = BTreeSet::new();
        for intent in intents {
            let path = intent.path();
            assert!(paths.insert(path.clone()), "duplicate path {path}");
            assert_eq!(Route::parse(&path), Some(Route::Known(intent)));
        }
    }

    #[test]
    fn test_profile_id_is_encoded() {
        let intent = Intent::Profile("ana/b?x y".into());
        let path = intent.path();
        assert_eq!(path, "/profile/ana%2Fb%3Fx%20y");
        assert_eq!(Route::parse(&path), Some(Route::Known(intent)));
    }

    #[test]
    fn test_parse_edge_cases() {
        assert_eq!(Route::parse("/nowhere"), None);
        assert_eq!(Route::parse("/closet/tea/123/brew"), None);
        assert_eq!(
            Route::parse("/closet/tea/not-a-uuid/edit"),
            Some(Route::MalformedTea("not-a-uuid".into()))
        );
        assert_eq!(
            Route::parse("/closet?type=rooibos"),
            Some(Route::Known(Intent::Closet(TeaFilter::All)))
        );
        assert_eq!(
            Route::parse("/closet/"),
            Some(Route::Known(Intent::Closet(TeaFilter::All)))
        );
    }

    #[test]
    fn test_presentation_mode() {
        let id = TeaId::new();
        for intent in [Intent::EditTea(id), Intent::DeleteTea(id), Intent::CreateTea] {
            assert_eq!(presentation_mode(&intent, Viewport::Wide), PresentationMode::Overlay);
            assert_eq!(presentation_mode(&intent, Viewport::Narrow), PresentationMode::Page);
        }
        assert_eq!(
            presentation_mode(&Intent::ViewTea(id), Viewport::Wide),
            PresentationMode::Page
        );
        assert_eq!(Viewport::from_width(1024), Viewport::Wide);
        assert_eq!(Viewport::from_width(1023), Viewport::Narrow);
    }

    #[test]
    fn test_resolve_existing_tea() {
        let (state, id) = state_with_tea();
        let resolution = resolve(&state, &Intent::EditTea(id).path(), Viewport::Wide).unwrap();
        let Resolution::Render { mode, tea, .. } = resolution else {
            panic!("expected render");
        };
        assert_eq!(mode, PresentationMode::Overlay);
        assert_eq!(tea.map(|t| t.id), Some(id));
    }

    #[test]
    fn test_edit_missing_tea_is_not_found() {
        let (state, _) = state_with_tea();
        let missing = TeaId::new();
        let resolution = resolve_intent(&state, Intent::EditTea(missing), Viewport::Narrow);
        let Resolution::NotFound(view) = resolution else {
            panic!("expected not found");
        };
        assert_eq!(view.tea_id, missing.to_string());
        assert_eq!(view.available_teas, 1);
        assert!(!view.can_clear_data);
        assert_eq!(view.actions(), vec![RecoveryAction::Back]);
    }

    #[test]
    fn test_stale_link_after_clear_offers_reset() {
        let (mut state, id) = state_with_tea();
        let _ = clear_collection(&mut state);

        let Some(Resolution::NotFound(view)) =
            resolve(&state, &Intent::ViewTea(id).path(), Viewport::Wide)
        else {
            panic!("expected not found");
        };
        assert!(view.can_clear_data);
        assert_eq!(view.actions(), vec![RecoveryAction::Back, RecoveryAction::ClearData]);
        assert_eq!(recover(&mut state, RecoveryAction::ClearData), "/closet");
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let (state, _) = state_with_tea();
        let resolution = resolve(&state, "/closet/tea/xyz", Viewport::Narrow);
        assert!(matches!(resolution, Some(Resolution::NotFound(ref v)) if v.tea_id == "xyz"));
    }

    #[test]
    fn test_recover_back() {
        let (mut state, _) = state_with_tea();
        assert_eq!(recover(&mut state, RecoveryAction::Back), "/closet");
        assert_eq!(state.teas.count(), 1);
    }

    #[test]
    fn test_menu_active_state() {
        let menu = profile_menu("lucca", "/closet/tea/new");
        let active: Vec<&str> = menu.iter().filter(|e| e.is_active).map(|e| e.id).collect();
        assert_eq!(active, vec!["collection"]);
        assert_eq!(menu[0].resolved_href, "/profile/lucca");

        let menu = profile_menu("lucca", "/profile/lucca");
        assert!(menu[0].is_active);

        let discover = &PROFILE_MENU_ITEMS[2];
        assert!(discover.is_active("/discover", "lucca"));
        assert!(!discover.is_active("/discover/more", "lucca"));
        assert_eq!(discover.target("lucca"), None);
        assert_eq!(PROFILE_MENU_ITEMS[1].target("lucca").as_deref(), Some("/closet"));
    }

    #[test]
    fn test_modal_registry() {
        let mut modals = ModalRegistry::new();
        modals.open("filters");
        assert!(modals.is_open("filters"));
        assert!(!modals.toggle("filters"));
        assert!(modals.toggle("profile-menu"));
        modals.open("delete");
        assert_eq!(modals.open_ids().collect::<Vec<_>>(), vec!["delete", "profile-menu"]);
        modals.close("delete");
        modals.close_all();
        assert_eq!(modals, ModalRegistry::new());
    }
}
