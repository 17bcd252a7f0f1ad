use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{DomainError, DomainResult};

/// Closed set of roles a user can hold.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            other => Err(DomainError::validation(format!("invalid role '{}'", other))),
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Builds an unpersisted `User`-role account from an already hashed password.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> DomainResult<Self> {
        let username = username.into();
        let password_hash = password_hash.into();
        if username.is_empty() || password_hash.is_empty() {
            return Err(DomainError::validation(
                "missing required user fields for new user",
            ));
        }
        Ok(Self {
            id: None,
            username,
            password_hash,
            role: Role::User,
        })
    }

    /// Clears the password hash so the value is safe to hand back to callers.
    pub fn without_password(mut self) -> Self {
        self.password_hash.clear();
        self
    }
}

/// Decoded payload of a signed authentication token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's identity.
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    pub iss: String,
}
