//! Request validation shared by all payload DTOs.
//!
//! DTOs declare their field requirements with `validator` attributes; this
//! module turns the resulting [`ValidationErrors`] into a flat, exhaustive
//! map of `field -> [messages]` and classifies the failure:
//!
//! - [`FailureKind::Missing`] - at least one required field is absent
//! - [`FailureKind::Invalid`] - everything required is present, something is malformed
//!
//! Nested errors are flattened with dotted paths (`contacts.0.street`).

use regex::Regex;
use serde_json::{Value, json};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::AppError;

/// Error code `validator` emits for `#[validate(required)]`.
pub const REQUIRED_CODE: &str = "required";

/// Phone numbers: optional leading `+`, then digits, spaces, dashes and parentheses.
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9()\- ]{3,19}$").unwrap());

const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "12345678", "123456789", "1234567890", "qwertyui", "qwerty123",
    "iloveyou", "11111111", "abc12345", "admin123", "letmein1", "welcome1", "sunshine",
];

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejects values made only of whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("blank", "This field may not be blank."));
    }
    Ok(())
}

/// Password rules: minimum length, not entirely numeric, not a common password.
pub fn password_strength(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(error_with_message(
            "password_too_short",
            "This password is too short. It must contain at least 8 characters.",
        ));
    }

    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(error_with_message(
            "password_entirely_numeric",
            "This password is entirely numeric.",
        ));
    }

    let lowered = value.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Err(error_with_message(
            "password_too_common",
            "This password is too common.",
        ));
    }

    Ok(())
}

/// How a payload failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Missing,
    Invalid,
}

/// Every problem found in a payload, keyed by field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    kind: FailureKind,
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Builds a single-field failure.
    pub fn single(field: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.into()]);
        Self { kind, fields }
    }

    /// Shorthand for a missing required field.
    pub fn missing(field: &str) -> Self {
        Self::single(field, FailureKind::Missing, "This field is required.")
    }

    /// Flattens `validator` output, recording whether any field was missing.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        let mut missing = false;
        collect("", errors, &mut fields, &mut missing);

        Self {
            kind: if missing {
                FailureKind::Missing
            } else {
                FailureKind::Invalid
            },
            fields,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn to_json(&self) -> Value {
        json!(self.fields)
    }

    fn message(&self) -> &'static str {
        match self.kind {
            FailureKind::Missing => "Required fields are missing",
            FailureKind::Invalid => "Fields are invalid",
        }
    }

    /// Reports every failure as 400 Bad Request.
    pub fn into_bad_request(self) -> AppError {
        AppError::bad_request(self.message(), self.to_json())
    }

    /// Account payloads (registration, profile update): missing fields are
    /// 400 Bad Request, invalid ones 403 Forbidden.
    pub fn into_account_error(self) -> AppError {
        match self.kind {
            FailureKind::Missing => self.into_bad_request(),
            FailureKind::Invalid => AppError::forbidden(self.message(), self.to_json()),
        }
    }
}

fn collect(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
    missing: &mut bool,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    if error.code == REQUIRED_CODE {
                        *missing = true;
                    }
                    out.entry(path.clone()).or_default().push(message_for(error));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out, missing),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(&format!("{path}.{index}"), inner, out, missing);
                }
            }
        }
    }
}

fn message_for(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({}).", error.code),
    }
}

/// Runs a payload's declared validation.
///
/// # Errors
///
/// Returns the full [`FieldErrors`] map; validation never stops at the first
/// problem.
pub fn check<T: Validate>(payload: &T) -> Result<(), FieldErrors> {
    payload
        .validate()
        .map_err(|errors| FieldErrors::from_validation(&errors))
}
