//! Tea collection commands.
//!
//! Create and edit go through the tea form schema first; only a valid
//! payload reaches the store. Every mutation is announced on the event
//! channel, and a failed write-back additionally raises
//! [`AppEvent::PersistenceDegraded`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use alba_shared::form::{FieldKind, FormState, FormValues};
use alba_shared::tea_form::tea_form;
use alba_shared::{TeaFilter, TeaId, ValidationErrors};
use alba_store::filter::EmptyState;
use alba_store::{apply_filter, FilterCounts, Mutation, NewTea, Tea, TeaPatch};

use crate::commands::settings::get_settings;
use crate::error::CommandError;
use crate::events::{emit_event, AppEvent};
use crate::state::AppState;

/// Form fields that may be cleared on edit. Name and type are required and
/// can only be replaced.
const CLEARABLE_FIELDS: [&str; 4] = ["brewTime", "infusionIngredients", "description", "tastingNotes"];

pub fn create_tea(state: &mut AppState, values: &FormValues) -> Result<Mutation<Tea>, CommandError> {
    let payload = tea_form().submit(values)?;
    let new: NewTea = from_payload(payload)?;

    let outcome = state.teas.add(new)?;
    emit_event(&state.events, AppEvent::TeaAdded { tea_id: outcome.value.id });
    report_degraded(state, &outcome);

    tracing::info!(tea_id = %outcome.value.id, "tea created");
    Ok(outcome)
}

/// Apply an edit form. Visible optional fields left blank are cleared.
pub fn edit_tea(
    state: &mut AppState,
    id: TeaId,
    values: &FormValues,
) -> Result<Mutation<Tea>, CommandError> {
    if state.teas.get(id).is_none() {
        return Err(tea_not_found(id));
    }

    let schema = tea_form();
    let mut payload = schema.submit(values)?;
    for name in CLEARABLE_FIELDS {
        let visible = schema.field(name).is_some_and(|f| f.is_visible(values));
        if visible && !payload.contains_key(name) {
            payload.insert(name.to_string(), Value::Null);
        }
    }

    let patch: TeaPatch = from_payload(payload)?;
    let outcome = state.teas.update(id, patch)?;
    emit_event(&state.events, AppEvent::TeaUpdated { tea_id: id });
    report_degraded(state, &outcome);
    Ok(outcome)
}

pub fn toggle_favorite(state: &mut AppState, id: TeaId) -> Result<Mutation<Tea>, CommandError> {
    let outcome = state.teas.toggle_favorite(id)?;
    emit_event(&state.events, AppEvent::TeaUpdated { tea_id: id });
    report_degraded(state, &outcome);
    Ok(outcome)
}

/// Delete a tea. Deleting an unknown id is a no-op.
pub fn delete_tea(state: &mut AppState, id: TeaId) -> Mutation<Option<Tea>> {
    let outcome = state.teas.remove(id);
    if outcome.value.is_some() {
        emit_event(&state.events, AppEvent::TeaRemoved { tea_id: id });
        report_degraded(state, &outcome);
    }
    outcome
}

/// Drop every tea. Only call this after the user confirmed it.
pub fn clear_collection(state: &mut AppState) -> Mutation<usize> {
    let outcome = state.teas.clear_all();
    emit_event(
        &state.events,
        AppEvent::CollectionCleared {
            dropped: outcome.value,
        },
    );
    report_degraded(state, &outcome);
    outcome
}

pub fn get_tea(state: &AppState, id: TeaId) -> Result<Tea, CommandError> {
    state.teas.get(id).cloned().ok_or_else(|| tea_not_found(id))
}

/// Empty form for a new tea.
pub fn new_tea_form() -> FormState {
    FormState::new(tea_form(), FormValues::new())
}

/// Form pre-filled with an existing tea.
pub fn edit_tea_form(state: &AppState, id: TeaId) -> Result<FormState, CommandError> {
    let tea = get_tea(state, id)?;
    Ok(FormState::new(tea_form(), tea_to_form_values(&tea)))
}

/// Initial edit-form values for `tea`, keyed by form field name.
pub fn tea_to_form_values(tea: &Tea) -> FormValues {
    let Ok(Value::Object(fields)) = serde_json::to_value(tea) else {
        return FormValues::new();
    };

    let schema = tea_form();
    fields
        .into_iter()
        .filter(|(name, _)| schema.field(name).is_some())
        .map(|(name, value)| {
            // Number inputs edit text.
            let value = match (schema.field(&name).map(|f| f.kind), value) {
                (Some(FieldKind::Number), Value::Number(n)) => Value::String(n.to_string()),
                (_, other) => other,
            };
            (name, value)
        })
        .collect::<Map<String, Value>>()
}

/// Everything the closet page shows for one filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosetView {
    pub filter: TeaFilter,
    pub title: String,
    /// Visible teas in display order.
    pub teas: Vec<Tea>,
    pub counts: FilterCounts,
    pub empty_state: Option<EmptyState>,
}

/// The closet for the `type` query value, falling back to the saved
/// default filter. Ordering follows the saved newest-first preference.
pub fn closet_view(state: &AppState, type_query: Option<&str>) -> ClosetView {
    let settings = get_settings(state);
    let filter = match type_query {
        Some(_) => TeaFilter::from_query(type_query),
        None => settings.default_filter,
    };

    let view = apply_filter(state.teas.list(), filter);
    ClosetView {
        filter,
        title: view.title(),
        teas: view
            .ordered(settings.newest_first)
            .into_iter()
            .cloned()
            .collect(),
        counts: view.counts,
        empty_state: view.is_empty().then(|| view.empty_state()),
    }
}

fn from_payload<T: DeserializeOwned>(payload: FormValues) -> Result<T, CommandError> {
    serde_json::from_value(Value::Object(payload)).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.insert("form", e.to_string());
        CommandError::Validation(errors)
    })
}

fn tea_not_found(id: TeaId) -> CommandError {
    CommandError::NotFound(format!("Tea not found: {id}"))
}

fn report_degraded<T>(state: &AppState, outcome: &Mutation<T>) {
    if let Some(err) = &outcome.persist_error {
        emit_event(
            &state.events,
            AppEvent::PersistenceDegraded {
                slot: err.slot.clone(),
                reason: err.reason.clone(),
            },
        );
    }
}
