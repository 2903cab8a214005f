//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, record-level failures (validation,
/// missing fields). Store and transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. negative price, empty name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required field was absent on an incoming record.
    #[error("missing field `{field}` on record `{record}`")]
    MissingField { record: String, field: &'static str },

    /// A required column was absent from a whole batch.
    #[error("missing column `{0}` in batch")]
    MissingColumn(&'static str),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn missing_field(record: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            record: record.into(),
            field,
        }
    }

    pub fn missing_column(column: &'static str) -> Self {
        Self::MissingColumn(column)
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
