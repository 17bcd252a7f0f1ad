use std::sync::Arc;

use crate::domain::{
    DomainError, DomainResult, PasswordError, PasswordService, Role, TokenService, User,
    UserRepository,
};

/// Registration, login and account bootstrapping.
pub struct UserUseCase {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl UserUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Registers a `User`-role account and returns it without its hash.
    ///
    /// # Errors
    ///
    /// `UsernameTaken` when the username exists (including when a concurrent
    /// registration wins the race), `ValidationFailed` for empty fields.
    pub async fn register_user(&self, username: &str, password: &str) -> DomainResult<User> {
        match self.users.get_user_by_username(username).await {
            Ok(_) => return Err(DomainError::UsernameTaken),
            Err(DomainError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        let user = User::new(username, self.hash(password).await?)?;
        let saved = self.users.create_user(&user).await?;
        log::info!("Registered user '{}' ({:?})", saved.username, saved.id);
        Ok(saved.without_password())
    }

    /// Exchanges credentials for a signed token.
    ///
    /// Every failure to find the user or match the password yields
    /// `InvalidCredentials`, so the response never reveals which usernames
    /// exist.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<String> {
        let user = match self.users.get_user_by_username(username).await {
            Ok(user) => user,
            Err(DomainError::UserNotFound) => return Err(DomainError::InvalidCredentials),
            Err(e) => {
                log::error!("Login lookup for user '{}' failed: {}", username, e);
                return Err(DomainError::InvalidCredentials);
            }
        };

        match self.passwords.compare(password, &user.password_hash).await {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => return Err(DomainError::InvalidCredentials),
            Err(e) => {
                log::warn!("Failed to verify password for user '{}': {}", username, e);
                return Err(DomainError::InvalidCredentials);
            }
        }

        self.tokens
            .issue_token(&user)
            .map_err(|e| DomainError::internal(e.to_string()))
    }

    /// Creates an `Admin` account named `username` unless one already exists.
    ///
    /// Used at startup so a fresh deployment has someone able to manage tasks.
    /// An existing account is left untouched, whatever its role.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> DomainResult<User> {
        match self.users.get_user_by_username(username).await {
            Ok(existing) => {
                if existing.role != Role::Admin {
                    log::warn!(
                        "Bootstrap account '{}' exists with role {}; leaving it unchanged",
                        username,
                        existing.role
                    );
                }
                return Ok(existing.without_password());
            }
            Err(DomainError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        log::info!("Default admin user '{}' not found. Creating it.", username);
        let mut admin = User::new(username, self.hash(password).await?)?;
        admin.role = Role::Admin;
        let saved = self.users.create_user(&admin).await?;
        Ok(saved.without_password())
    }

    async fn hash(&self, password: &str) -> DomainResult<String> {
        self.passwords
            .hash(password)
            .await
            .map_err(|e| DomainError::internal(e.to_string()))
    }
}
