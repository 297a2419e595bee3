//! Validation of user request bodies.
//!
//! Both validators work on the raw JSON body so they can tell a missing field
//! from one of the wrong type. A field is *absent* when its key is missing or
//! its value is falsy: `null`, `""`, `false`, or a numeric zero. Any other
//! value counts as provided. Checks run in a fixed order so the reported error is
//! deterministic:
//!
//! 1. presence (create: every field; update: at least one field)
//! 2. type (every provided field must be a string)
//! 3. blank after trimming, per field in `firstName`, `lastName`, `hobby` order
//!
//! On success the returned payload holds trimmed values.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::user::trim_field;
use crate::{NewUser, UserField, UserPatch};

/// Which of the required fields were absent from a create body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingFields {
    pub first_name: bool,
    pub last_name: bool,
    pub hobby: bool,
}

impl MissingFields {
    /// Returns true if at least one field is missing.
    pub fn any(&self) -> bool {
        self.first_name || self.last_name || self.hobby
    }

    /// Returns the missing fields in check order.
    pub fn fields(&self) -> Vec<UserField> {
        UserField::ALL
            .into_iter()
            .filter(|field| self.is_missing(*field))
            .collect()
    }

    /// Returns whether a single field is missing.
    pub fn is_missing(&self, field: UserField) -> bool {
        match field {
            UserField::FirstName => self.first_name,
            UserField::LastName => self.last_name,
            UserField::Hobby => self.hobby,
        }
    }

    fn mark(&mut self, field: UserField) {
        match field {
            UserField::FirstName => self.first_name = true,
            UserField::LastName => self.last_name = true,
            UserField::Hobby => self.hobby = true,
        }
    }
}

/// Why a request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// One or more required fields were absent.
    #[error("First name, last name, and hobby are required.")]
    MissingFields(MissingFields),

    /// A provided field was not a string.
    #[error("First name, last name, and hobby must be strings.")]
    TypeMismatch { fields: Vec<UserField> },

    /// A field was only whitespace.
    #[error("{} cannot be empty or whitespace only.", .0.label())]
    EmptyAfterTrim(UserField),

    /// An update body carried none of the editable fields.
    #[error("At least one of first name, last name, or hobby must be provided.")]
    NoFieldsProvided,
}

impl ValidationFailure {
    /// Machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationFailure::MissingFields(_) => "missing_fields",
            ValidationFailure::TypeMismatch { .. } => "type_mismatch",
            ValidationFailure::EmptyAfterTrim(_) => "empty_after_trim",
            ValidationFailure::NoFieldsProvided => "no_fields_provided",
        }
    }

    /// Fields the failure is about, in check order.
    pub fn fields(&self) -> Vec<UserField> {
        match self {
            ValidationFailure::MissingFields(missing) => missing.fields(),
            ValidationFailure::TypeMismatch { fields } => fields.clone(),
            ValidationFailure::EmptyAfterTrim(field) => vec![*field],
            ValidationFailure::NoFieldsProvided => UserField::ALL.to_vec(),
        }
    }
}

/// How a single field appears in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldValue<'a> {
    /// Key missing, or a falsy value.
    Absent,
    /// A non-empty string, not yet trimmed.
    Text(&'a str),
    /// Any other JSON value.
    Other,
}

impl FieldValue<'_> {
    fn is_provided(&self) -> bool {
        !matches!(self, FieldValue::Absent)
    }
}

fn classify(body: &Value, field: UserField) -> FieldValue<'_> {
    match body.get(field.json_key()) {
        None | Some(Value::Null) => FieldValue::Absent,
        Some(Value::String(s)) if s.is_empty() => FieldValue::Absent,
        Some(Value::String(s)) => FieldValue::Text(s),
        Some(Value::Bool(false)) => FieldValue::Absent,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => FieldValue::Absent,
        Some(_) => FieldValue::Other,
    }
}

fn classify_all(body: &Value) -> [(UserField, FieldValue<'_>); 3] {
    UserField::ALL.map(|field| (field, classify(body, field)))
}

/// Type-checks and trims every provided field.
///
/// All provided fields are type-checked before any is trimmed, so a body with
/// both a number and a blank string reports the type mismatch.
fn normalize_provided(
    values: &[(UserField, FieldValue<'_>)],
) -> Result<Vec<(UserField, String)>, ValidationFailure> {
    let mismatched: Vec<UserField> = values
        .iter()
        .filter(|(_, value)| matches!(value, FieldValue::Other))
        .map(|(field, _)| *field)
        .collect();
    if !mismatched.is_empty() {
        return Err(ValidationFailure::TypeMismatch { fields: mismatched });
    }

    let mut normalized = Vec::with_capacity(values.len());
    for (field, value) in values {
        if let FieldValue::Text(text) = value {
            let trimmed = trim_field(text);
            if trimmed.is_empty() {
                return Err(ValidationFailure::EmptyAfterTrim(*field));
            }
            normalized.push((*field, trimmed.to_string()));
        }
    }
    Ok(normalized)
}

/// Validates a create body, returning the trimmed fields.
pub fn validate_create(body: &Value) -> Result<NewUser, ValidationFailure> {
    let values = classify_all(body);

    let mut missing = MissingFields::default();
    for (field, value) in &values {
        if !value.is_provided() {
            missing.mark(*field);
        }
    }
    if missing.any() {
        return Err(ValidationFailure::MissingFields(missing));
    }

    let mut patch = UserPatch::default();
    for (field, value) in normalize_provided(&values)? {
        patch.set(field, value);
    }

    // Every field passed the presence check, so each one was normalized.
    Ok(NewUser {
        first_name: patch.first_name.unwrap_or_default(),
        last_name: patch.last_name.unwrap_or_default(),
        hobby: patch.hobby.unwrap_or_default(),
    })
}

/// Validates an update body, returning only the provided fields, trimmed.
pub fn validate_update(body: &Value) -> Result<UserPatch, ValidationFailure> {
    let values = classify_all(body);

    if !values.iter().any(|(_, value)| value.is_provided()) {
        return Err(ValidationFailure::NoFieldsProvided);
    }

    let mut patch = UserPatch::default();
    for (field, value) in normalize_provided(&values)? {
        patch.set(field, value);
    }
    Ok(patch)
}
