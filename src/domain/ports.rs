//! Capability traits the use cases depend on.
//!
//! Storage engines and auth services are injected as `Arc<dyn Trait>`; any
//! implementation honouring these contracts can be swapped in without touching
//! the use cases.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use super::error::DomainResult;
use super::task::Task;
use super::user::{Claims, User};

/// Persistence contract for tasks.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its assigned identity.
    async fn create_task(&self, task: &Task) -> DomainResult<Task>;

    /// # Errors
    ///
    /// Returns [`DomainError::TaskNotFound`](super::DomainError::TaskNotFound)
    /// when no task has this identity.
    async fn get_task_by_id(&self, id: Uuid) -> DomainResult<Task>;

    async fn get_all_tasks(&self) -> DomainResult<Vec<Task>>;

    /// Replaces the stored document with `task` in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` when no task has this identity.
    async fn update_task(&self, id: Uuid, task: &Task) -> DomainResult<Task>;

    /// # Errors
    ///
    /// Returns `TaskNotFound` when nothing was deleted.
    async fn delete_task(&self, id: Uuid) -> DomainResult<()>;
}

/// Persistence contract for users.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `UsernameTaken` when the username already exists.
    async fn create_user(&self, user: &User) -> DomainResult<User>;

    /// # Errors
    ///
    /// Returns `UserNotFound` when no user has this username.
    async fn get_user_by_username(&self, username: &str) -> DomainResult<User>;
}

/// Failures of a [`PasswordService`].
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The plaintext does not match the digest. Expected during logins.
    #[error("password does not match")]
    Mismatch,

    #[error("malformed password hash: {0}")]
    MalformedHash(String),

    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// Salted one-way password hashing.
#[async_trait]
pub trait PasswordService: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Succeeds only when `password` matches `hashed_password`.
    async fn compare(&self, password: &str, hashed_password: &str) -> Result<(), PasswordError>;
}

/// Failures of a [`TokenService`].
///
/// Everything except [`TokenError::Expired`] displays as "invalid token" so
/// callers cannot probe why a token was rejected.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Malformed,

    #[error("invalid token")]
    UnsupportedAlgorithm,

    #[error("invalid token")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }
}

/// Issues and verifies signed claims.
#[cfg_attr(test, automock)]
pub trait TokenService: Send + Sync {
    fn issue_token(&self, user: &User) -> Result<String, TokenError>;

    fn verify_token(&self, token: &str) -> Result<Claims, TokenError>;
}
