use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::domain::{Claims, Role, TokenService};
use crate::error::AppError;

/// Verifies the bearer token and attaches its [`Claims`] to the request.
///
/// Performs no authorization; pair it with [`AuthorizeRole`] for role checks.
pub struct Authenticate {
    tokens: Arc<dyn TokenService>,
}

impl Authenticate {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthenticateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: S,
    tokens: Arc<dyn TokenService>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = bearer else {
            log::info!("Missing or malformed Authorization header on {}", req.path());
            let err = AppError::Unauthorized("Authorization token required".into());
            return Box::pin(async move { Err(err.into()) });
        };

        match self.tokens.verify_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(token_err) => {
                log::warn!("Token validation failed on {}: {:?}", req.path(), token_err);
                let err = AppError::from(token_err);
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}

/// Admits only requests whose authenticated role is one of `roles`.
///
/// Must run after [`Authenticate`]. A request that reaches it without claims
/// is a routing misconfiguration and is answered with a 500.
pub struct AuthorizeRole {
    roles: Rc<[Role]>,
}

impl AuthorizeRole {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new([Role::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthorizeRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthorizeRoleMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizeRoleMiddleware {
            service,
            roles: self.roles.clone(),
        }))
    }
}

pub struct AuthorizeRoleMiddleware<S> {
    service: S,
    roles: Rc<[Role]>,
}

impl<S> AuthorizeRoleMiddleware<S> {
    fn check(&self, claims: Option<&Claims>) -> Result<(), AppError> {
        match claims {
            None => Err(AppError::InternalServerError(
                "Authentication context missing: AuthorizeRole ran before Authenticate".into(),
            )),
            Some(claims) if self.roles.contains(&claims.role) => Ok(()),
            Some(claims) => {
                log::warn!(
                    "User '{}' (ID: {}) with role {} denied; requires one of {:?}",
                    claims.username,
                    claims.sub,
                    claims.role,
                    self.roles
                );
                Err(AppError::Forbidden(format!(
                    "Access forbidden: {} role required",
                    self.required_roles()
                )))
            }
        }
    }

    fn required_roles(&self) -> String {
        self.roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

impl<S, B> Service<ServiceRequest> for AuthorizeRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = self.check(req.extensions().get::<Claims>());
        match verdict {
            Ok(()) => Box::pin(self.service.call(req)),
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}
