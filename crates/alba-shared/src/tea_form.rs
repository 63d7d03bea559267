//! The create/edit tea form.

use serde_json::Value;

use crate::constants::{MAX_BREW_TIME, MAX_DESCRIPTION_WORDS, MAX_NAME_WORDS, MIN_BREW_TIME};
use crate::form::{as_number, FieldDescriptor, FieldKind, FormSchema, SelectOption};
use crate::types::TeaType;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn validate_name(value: &Value) -> Option<String> {
    let name = value.as_str().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Some("Name is required".into());
    }
    if word_count(name) > MAX_NAME_WORDS {
        return Some(format!("Name should be {MAX_NAME_WORDS} words or less"));
    }
    None
}

pub fn validate_description(value: &Value) -> Option<String> {
    match value.as_str() {
        Some(text) if word_count(text) > MAX_DESCRIPTION_WORDS => Some(format!(
            "Description should be {MAX_DESCRIPTION_WORDS} words or less"
        )),
        _ => None,
    }
}

/// Select values must name one of the closed tea types.
pub fn validate_tea_type(value: &Value) -> Option<String> {
    match value.as_str().map(str::parse::<TeaType>) {
        Some(Ok(_)) => None,
        _ => Some("Please select a valid tea type".into()),
    }
}

pub fn validate_brew_time(value: &Value) -> Option<String> {
    let absent = match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    };
    if absent {
        return None;
    }
    // Whole minutes only; the stored field is an integer.
    let in_range = as_number(value)
        .map(|n| n.fract() == 0.0 && n >= MIN_BREW_TIME as f64 && n <= MAX_BREW_TIME as f64)
        .unwrap_or(false);
    if in_range {
        None
    } else {
        Some(format!(
            "Brewing time should be between {MIN_BREW_TIME}-{MAX_BREW_TIME} minutes"
        ))
    }
}

/// Field list shared by the create and edit flows.
pub fn tea_form() -> FormSchema {
    let mut type_options = vec![SelectOption::new("", "Select tea type...")];
    type_options.extend(
        TeaType::ALL
            .iter()
            .map(|t| SelectOption::new(t.as_str(), t.label())),
    );

    FormSchema::new(vec![
        FieldDescriptor::new("name", "Name", FieldKind::Text)
            .required()
            .placeholder("Enter tea name...")
            .validator(validate_name),
        FieldDescriptor::new("type", "Type", FieldKind::Select)
            .required()
            .options(type_options)
            .validator(validate_tea_type),
        FieldDescriptor::new("brewTime", "Brewing Time (minutes)", FieldKind::Number)
            .placeholder("3-5 minutes typical")
            .validator(validate_brew_time),
        // No tea type currently equals "infusion", so this stays hidden.
        FieldDescriptor::new("infusionIngredients", "Infusion Ingredients", FieldKind::Text)
            .placeholder("e.g. chamomile, mint, etc.")
            .visible_when("type", "infusion"),
        FieldDescriptor::new("description", "Description or Notes", FieldKind::Textarea)
            .placeholder("Describe this tea...")
            .validator(validate_description),
        FieldDescriptor::new("tastingNotes", "Tasting Notes", FieldKind::Text)
            .placeholder("Floral, citrus, earthy... (separated by commas)"),
    ])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::form::FormValues;

    fn values(v: Value) -> FormValues {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_name_required() {
        let form = tea_form();
        assert!(form.validate_field("name", &json!("")).is_some());
        assert_eq!(form.validate_field("name", &json!("Earl Grey")), None);
    }

    #[test]
    fn test_name_word_limit() {
        let form = tea_form();
        assert_eq!(
            form.validate_field("name", &json!("one two three four five")),
            None
        );
        assert_eq!(
            form.validate_field("name", &json!("one two three four five six"))
                .as_deref(),
            Some("Name should be 5 words or less")
        );
    }

    #[test]
    fn test_description_word_limit() {
        let thirty = vec!["word"; 30].join(" ");
        let thirty_one = vec!["word"; 31].join(" ");
        assert_eq!(validate_description(&json!(thirty)), None);
        assert!(validate_description(&json!(thirty_one)).is_some());
        assert_eq!(validate_description(&Value::Null), None);
    }

    #[test]
    fn test_brew_time_range() {
        assert_eq!(validate_brew_time(&Value::Null), None);
        assert_eq!(validate_brew_time(&json!("")), None);
        assert_eq!(validate_brew_time(&json!(0)), None);
        assert_eq!(validate_brew_time(&json!(30)), None);
        assert_eq!(validate_brew_time(&json!("4")), None);
        assert!(validate_brew_time(&json!(31)).is_some());
        assert!(validate_brew_time(&json!(-1)).is_some());
        assert!(validate_brew_time(&json!("soon")).is_some());
        assert!(validate_brew_time(&json!(2.5)).is_some());
    }

    #[test]
    fn test_type_required() {
        let errors = tea_form().validate_all(&values(json!({ "name": "Sencha", "type": "" })));
        assert_eq!(errors.get("type"), Some("Type is required"));
    }

    #[test]
    fn test_type_must_be_a_known_type() {
        let form = tea_form();
        let errors = form.validate_all(&values(json!({ "name": "Rooibos", "type": "rooibos" })));
        assert_eq!(errors.get("type"), Some("Please select a valid tea type"));
        assert_eq!(form.validate_field("type", &json!("oolong")), None);
    }

    #[test]
    fn test_whole_float_brew_time_is_submitted_as_integer() {
        let payload = tea_form()
            .submit(&values(json!({ "name": "Assam", "type": "black", "brewTime": "2.0" })))
            .unwrap();
        assert_eq!(payload.get("brewTime"), Some(&json!(2)));
        assert!(payload["brewTime"].is_u64());
    }

    #[test]
    fn test_infusion_field_hidden_for_real_types() {
        let form = tea_form();
        let input = values(json!({
            "name": "Sencha",
            "type": "green",
            "infusionIngredients": "mint",
        }));
        assert!(form.validate_all(&input).is_empty());
        assert!(form.payload(&input).get("infusionIngredients").is_none());
    }

    #[test]
    fn test_type_options_cover_all_types() {
        let form = tea_form();
        let field = form.field("type").unwrap();
        assert_eq!(field.options.len(), TeaType::ALL.len() + 1);
        assert_eq!(field.options[5].label, "Pu-erh");
    }
}
