//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised when an engine definition is malformed at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid engine configuration: missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    /// Check if this error is caused by an absent required field
    pub fn is_missing_field(&self) -> bool {
        matches!(self, DomainError::MissingField(_))
    }
}
