use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::domain::{Claims, Role};
use crate::error::AppError;

/// The verified claims of the caller.
///
/// Only valid on routes wrapped by `Authenticate`, which stores the claims in
/// the request extensions. Missing claims mean the route was wired without it,
/// so extraction fails with an internal error rather than a 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser(claims))),
            None => {
                let err = AppError::InternalServerError(
                    "Claims not found in request. Ensure Authenticate is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
