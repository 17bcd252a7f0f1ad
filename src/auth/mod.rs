//! Credential handling: password hashing, token issuing, request
//! authentication and the register/login payloads.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::{Authenticate, AuthorizeRole};
pub use password::BcryptPasswordService;
pub use token::JwtTokenService;

lazy_static! {
    static ref USERNAME_CHARSET: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Body of `POST /user/register`.
///
/// Usernames are 3 to 32 characters of letters, digits, `_` or `-`.
/// Passwords need at least 6 characters.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_CHARSET",
            message = "username may only contain letters, digits, '_' and '-'"
        )
    )]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Body of `POST /user/login`.
///
/// Only presence is checked; anything stricter would hint at which accounts
/// exist.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
