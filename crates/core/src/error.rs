//! Error model for the core primitives.

use thiserror::Error;

/// Result type used across the core layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures. Storage concerns belong
/// to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed timestamp).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

/// Errors raised while parsing or resolving a list query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A `query` entry lacked the `key:value` separator.
    #[error("Error: invalid query key/value pair")]
    MalformedFilter(String),

    /// A sort direction other than `asc`/`desc`.
    #[error("Error: Invalid order. Must be either [asc|desc]")]
    InvalidOrder(String),

    #[error("Error: 'sortby', 'order' sizes mismatch or 'order' size is not 1")]
    SizeMismatch { sort_by: usize, order: usize },

    #[error("Error: unused 'order' fields")]
    UnusedOrder,
}
