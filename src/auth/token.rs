use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::domain::{Claims, TokenError, TokenService, User};

/// Issuer stamped into every token and required on verification.
pub const TOKEN_ISSUER: &str = "task-manager-app";

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// HS256 JWT implementation of [`TokenService`].
///
/// The signing secret is handed in at construction; nothing is read from the
/// environment here.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation
    }
}

impl TokenService for JwtTokenService {
    /// Generates a token carrying the user's identity and role.
    ///
    /// Fails with [`TokenError::Signing`] if the user has not been persisted
    /// yet or encoding fails.
    fn issue_token(&self, user: &User) -> Result<String, TokenError> {
        let user_id = user
            .id
            .ok_or_else(|| TokenError::Signing("user has no identity".into()))?;
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".into()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies the signature, algorithm, issuer and expiry of `token`.
    fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::MissingAlgorithm => TokenError::UnsupportedAlgorithm,
                _ => TokenError::Malformed,
            })
    }
}
