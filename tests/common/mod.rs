#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::{self, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::Value;
use task_manager::auth::{BcryptPasswordService, JwtTokenService};
use task_manager::repositories::{InMemoryTaskRepository, InMemoryUserRepository};
use task_manager::usecases::{TaskUseCase, UserUseCase};
use task_manager::AppState;

pub const SECRET: &str = "integration-test-secret";
pub const ADMIN: (&str, &str) = ("admin", "adminpassword");
pub const USER: (&str, &str) = ("alice", "wonderland");

/// Fresh in-memory state with the bootstrap admin and one `User`-role account.
pub async fn seeded_state() -> AppState {
    let tokens = Arc::new(JwtTokenService::with_default_ttl(SECRET));
    let users = Arc::new(UserUseCase::new(
        Arc::new(InMemoryUserRepository::new()),
        tokens.clone(),
        Arc::new(BcryptPasswordService::new(4)),
    ));
    users.ensure_admin(ADMIN.0, ADMIN.1).await.unwrap();
    users.register_user(USER.0, USER.1).await.unwrap();

    AppState {
        tasks: Arc::new(TaskUseCase::new(Arc::new(InMemoryTaskRepository::new()))),
        users,
        tokens,
    }
}

pub async fn login(state: &AppState, (username, password): (&str, &str)) -> String {
    state.users.login(username, password).await.unwrap()
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Sends `req` and returns the status and JSON body (`Null` when empty).
///
/// Middleware rejections surface as service errors rather than responses, so
/// they are rendered here the way the HTTP server would render them.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, bytes) = match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            (status, body::to_bytes(resp.into_body()).await.unwrap())
        }
    };
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
