use thiserror::Error;

use crate::database::DatabaseError;

/// A single violated rule. `field` is None for cross-field violations that
/// belong to the request as a whole rather than one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: Option<String>,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Every violated field from one validation pass. Validation never stops at
/// the first failure; clients get the full list in one response.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.joined_messages())
    }
}

impl std::error::Error for ValidationFailure {}

impl ValidationFailure {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn joined_messages(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn names_field(&self, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field.as_deref() == Some(field))
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{0}")]
    Validation(ValidationFailure),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}
