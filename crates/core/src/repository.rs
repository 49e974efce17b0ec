//! Persistence failure model shared by every repository.

use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage-layer failure. Handlers propagate these untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(String),

    /// A unique key was already taken when the change was committed.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// A stored row could not be mapped back into a domain value.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An in-process lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

impl RepositoryError {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
