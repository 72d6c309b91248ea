//! Input validation errors.

use thiserror::Error;

/// A rejected field in a creation or update request.
///
/// Carries the field name so the HTTP layer can surface it in the
/// problem-details response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
