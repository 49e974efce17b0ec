//! Domain and request error model.

use thiserror::Error;

use crate::repository::RepositoryError;
use crate::validation::ValidationErrors;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong in `RepositoryError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced entity does not exist. The message is user-facing.
    #[error("{0}")]
    NotFound(String),

    /// The operation conflicts with current state (duplicate key, already active, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Everything a request can fail with once it enters the pipeline.
///
/// Validation failures are raised before the handler runs; the remaining
/// variants come out of the handler itself.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The change was saved but the follow-up event could not be published.
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl From<ValidationErrors> for RequestError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl RequestError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(msg))
    }

    /// True when this is a `NotFound` domain error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::NotFound(_)))
    }
}
