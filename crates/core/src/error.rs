//! Domain error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Human-readable validation messages, shared by every entity.
pub mod messages {
    pub const BLANK: &str = "can't be blank";
    pub const INVALID: &str = "is invalid";
    pub const TAKEN: &str = "has already been taken";
    pub const NOT_A_NUMBER: &str = "is not a number";
    pub const NEGATIVE: &str = "must be greater than or equal to 0";
    pub const NOT_A_BOOLEAN: &str = "is not a boolean";
    pub const TOO_LARGE: &str = "is too large";
    pub const PASSWORD_TOO_SHORT: &str = "is too short (minimum is 8 characters)";
    pub const CONFIRMATION_MISMATCH: &str = "doesn't match Password";
}

/// Field name → every message of every rule the field violated.
///
/// Serializes as a plain JSON object, e.g. `{"price": ["is not a number"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.get(field)
            .is_some_and(|msgs| msgs.iter().any(|m| m == message))
    }

    /// `Ok(value)` when nothing was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Domain-level error.
///
/// Deterministic failures only; infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found.
    #[error("not found")]
    NotFound,

    /// The caller may not act on the resource.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
