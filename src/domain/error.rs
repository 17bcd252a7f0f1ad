//! Sentinel errors shared by the domain, repository and use-case layers.
//!
//! These carry no transport detail; `crate::error::AppError` owns the mapping
//! to HTTP statuses.

use thiserror::Error;

/// Expected failure conditions of the task manager's business operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad input shape or a violated domain rule.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("task not found")]
    TaskNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("username already taken")]
    UsernameTaken,

    /// Unknown username or wrong password. The two are deliberately
    /// indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unclassified storage-engine failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Failure inside a supporting service (hashing, signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::ValidationFailed(msg.into())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::Storage(err.to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result alias for domain, repository and use-case operations.
pub type DomainResult<T> = Result<T, DomainError>;
