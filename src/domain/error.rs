//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the layout and tree rules.
/// These are independent of transport and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid layout parameter {field}: {reason}")]
    InvalidLayout { field: &'static str, reason: String },

    #[error("tree exceeds maximum depth of {limit}")]
    TooDeep { limit: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
