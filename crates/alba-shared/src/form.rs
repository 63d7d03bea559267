//! Declarative form validation.
//!
//! A [`FormSchema`] is an ordered list of [`FieldDescriptor`]s. Each field can
//! be required, carry a custom validator, and be conditionally visible based
//! on the current value of another field. Hidden fields are neither validated
//! nor included in the submitted payload.
//!
//! The same schema serves create and edit flows; only the initial values in
//! [`FormState`] differ.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::ValidationErrors;

/// Raw form values keyed by field name.
pub type FormValues = Map<String, Value>;

/// Returns an error message when the value is invalid.
pub type Validator = fn(&Value) -> Option<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
    Number,
    Checkbox,
    CheckboxGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Visibility rule: the owning field exists only while `field == value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub field: String,
    pub value: Value,
}

impl Conditional {
    pub fn holds(&self, values: &FormValues) -> bool {
        values.get(&self.field) == Some(&self.value)
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
    pub validate: Option<Validator>,
    pub conditional: Option<Conditional>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("has_validator", &self.validate.is_some())
            .field("conditional", &self.conditional)
            .finish()
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            placeholder: None,
            options: Vec::new(),
            validate: None,
            conditional: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn validator(mut self, validate: Validator) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn visible_when(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditional = Some(Conditional {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Whether the field takes part in the form given the other values.
    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.conditional.as_ref().map_or(true, |c| c.holds(values))
    }

    /// Required check first, then the custom validator.
    pub fn check(&self, value: &Value) -> Option<String> {
        if self.required && is_blank(value) {
            return Some(format!("{} is required", self.label));
        }
        self.validate.and_then(|validate| validate(value))
    }
}

/// Null, whitespace-only strings, empty lists and unchecked boxes count as
/// "no value" for the required check.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(b) => !b,
        _ => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a single value. Unknown field names never fail.
    pub fn validate_field(&self, name: &str, value: &Value) -> Option<String> {
        self.field(name).and_then(|field| field.check(value))
    }

    /// Validate every visible field. An empty result means the form is valid.
    pub fn validate_all(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in self.fields.iter().filter(|f| f.is_visible(values)) {
            let value = values.get(&field.name).unwrap_or(&Value::Null);
            if let Some(message) = field.check(value) {
                errors.insert(field.name.clone(), message);
            }
        }
        errors
    }

    /// The submitted shape of the form: visible fields only, strings trimmed,
    /// blanks dropped, numeric text of number fields converted to numbers.
    pub fn payload(&self, values: &FormValues) -> FormValues {
        let mut out = FormValues::new();
        for field in self.fields.iter().filter(|f| f.is_visible(values)) {
            let Some(value) = values.get(&field.name) else {
                continue;
            };
            if let Some(normalized) = normalize(field.kind, value) {
                out.insert(field.name.clone(), normalized);
            }
        }
        out
    }

    /// Validate, then produce the payload.
    pub fn submit(&self, values: &FormValues) -> Result<FormValues, ValidationErrors> {
        let errors = self.validate_all(values);
        if errors.is_empty() {
            Ok(self.payload(values))
        } else {
            Err(errors)
        }
    }
}

fn normalize(kind: FieldKind, value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if kind == FieldKind::Number {
                if let Some(number) = parse_number(trimmed) {
                    return Some(Value::Number(number));
                }
            }
            Some(Value::String(trimmed.to_string()))
        }
        Value::Number(n) if kind == FieldKind::Number && n.is_f64() => {
            Some(n.as_f64().and_then(whole_number).map_or_else(|| value.clone(), Value::Number))
        }
        other => Some(other.clone()),
    }
}

/// Whole values ("2", "2.0") become integers; anything else numeric becomes
/// a float.
pub fn parse_number(text: &str) -> Option<Number> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    text.parse::<f64>().ok().and_then(whole_number)
}

fn whole_number(f: f64) -> Option<Number> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

/// Numeric view of a value that may arrive as a number or as text.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Interactive form state: current values and the errors shown for them.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    values: FormValues,
    errors: ValidationErrors,
}

impl FormState {
    pub fn new(schema: FormSchema, initial: FormValues) -> Self {
        Self {
            schema,
            values: initial,
            errors: ValidationErrors::new(),
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Editing a field clears the error shown for it.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
        self.errors.remove(name);
    }

    /// Leaving a field validates just that field.
    pub fn blur(&mut self, name: &str) -> Option<&str> {
        let value = self.values.get(name).cloned().unwrap_or(Value::Null);
        match self.schema.validate_field(name, &value) {
            Some(message) => {
                self.errors.insert(name, message);
                self.errors.get(name)
            }
            None => None,
        }
    }

    pub fn submit(&mut self) -> Result<FormValues, ValidationErrors> {
        let result = self.schema.submit(&self.values);
        self.errors = match &result {
            Ok(_) => ValidationErrors::new(),
            Err(errors) => errors.clone(),
        };
        result
    }

    pub fn reset(&mut self, values: FormValues) {
        self.values = values;
        self.errors = ValidationErrors::new();
    }
}
