use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

use crate::domain::{PasswordError, PasswordService};

/// bcrypt-backed [`PasswordService`].
///
/// Hashing and verification run on tokio's blocking pool so the work factor
/// does not stall the request workers.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordService {
    cost: u32,
}

impl BcryptPasswordService {
    /// A `cost` of `0` selects `bcrypt::DEFAULT_COST`.
    pub fn new(cost: u32) -> Self {
        let cost = if cost == 0 { DEFAULT_COST } else { cost };
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordService {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordService for BcryptPasswordService {
    async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| PasswordError::Hashing(e.to_string()))?
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    async fn compare(&self, password: &str, hashed_password: &str) -> Result<(), PasswordError> {
        let password = password.to_owned();
        let hashed_password = hashed_password.to_owned();
        let matched = tokio::task::spawn_blocking(move || verify(password, &hashed_password))
            .await
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        match matched {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e @ (BcryptError::InvalidHash(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidCost(_))) => Err(PasswordError::MalformedHash(e.to_string())),
            Err(e) => Err(PasswordError::Hashing(e.to_string())),
        }
    }
}
