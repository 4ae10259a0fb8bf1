//! Input limits and field-level validation errors.
//!
//! Request bodies are validated with `validator` derives in the API layer.
//! Their [`validator::ValidationErrors`] are flattened into [`FieldErrors`],
//! a plain `field -> [messages]` map that is serialized verbatim into the
//! `fields` member of a 400 response.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Minimum password length for registration and password changes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum track title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Message used for absent or blank required fields.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Validation messages grouped by field name.
///
/// Errors that do not belong to a single field are stored under
/// [`FieldErrors::NON_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Key for errors that concern the request as a whole.
    pub const NON_FIELD: &'static str = "non_field_errors";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map holding a single message for `field`.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Merge another set of errors into this one.
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when empty, otherwise the errors wrapped in a [`CoreError`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl From<&validator::ValidationErrors> for FieldErrors {
    fn from(errors: &validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(&err.code));
                out.add(field.as_ref(), message);
            }
        }
        out
    }
}

/// Fallback text for `validator` rules declared without a custom message.
fn default_message(code: &str) -> String {
    match code {
        "required" => REQUIRED_MESSAGE.to_string(),
        "email" => "Enter a valid email address.".to_string(),
        "length" => "Ensure this field has a valid length.".to_string(),
        other => format!("Invalid value ({other})."),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Return the trimmed value, or `None` when absent or whitespace-only.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validate a track title: required, non-blank, at most [`MAX_TITLE_LENGTH`] chars.
pub fn validate_title(errors: &mut FieldErrors, title: Option<&str>) {
    match non_blank(title) {
        None => errors.add("title", REQUIRED_MESSAGE),
        Some(t) if t.chars().count() > MAX_TITLE_LENGTH => errors.add(
            "title",
            format!("Ensure this field has no more than {MAX_TITLE_LENGTH} characters."),
        ),
        Some(_) => {}
    }
}

/// `validator` custom rule: an email may be empty, otherwise well-formed.
pub fn optional_email(email: &str) -> Result<(), validator::ValidationError> {
    use validator::ValidateEmail;

    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("email"))
    }
}

/// `validator` custom rule: reject whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("required"))
    } else {
        Ok(())
    }
}
