//! Error types for grid operations

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::RecordId;

/// A single required-field failure reported by form validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable message, e.g. "Name is required"
    pub message: String,
}

/// Per-field validation failures, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Drop the error recorded for `field`
    pub fn clear(&mut self, field: &str) {
        self.0.retain(|e| e.field != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Errors that can occur during grid operations
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Ambiguous id allocation: {0}")]
    AmbiguousId(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    pub fn record_not_found(id: impl Into<RecordId>) -> Self {
        Self::RecordNotFound(id.into())
    }

    pub fn ambiguous_id(msg: impl Into<String>) -> Self {
        Self::AmbiguousId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for GridError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_lookup_and_clear() {
        let mut errors = FieldErrors::new();
        errors.push("name", "Name is required");
        errors.push("email", "Email is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Email is required"));

        errors.clear("name");
        assert!(errors.get("name").is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = GridError::record_not_found(7);
        assert_eq!(err.to_string(), "Record not found: 7");

        let mut errors = FieldErrors::new();
        errors.push("name", "Name is required");
        let err = GridError::from(errors);
        assert_eq!(err.to_string(), "Validation error: Name is required");
        assert!(err.field_errors().is_some());
    }
}
