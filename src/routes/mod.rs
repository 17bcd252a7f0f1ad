pub mod health;
pub mod tasks;
pub mod user;

use std::sync::Arc;

use actix_web::{guard, web};

use crate::{
    auth::{Authenticate, AuthorizeRole},
    domain::TokenService,
    error::AppError,
    usecases::{TaskUseCase, UserUseCase},
};

/// Everything the HTTP layer needs, built once at startup and cloned into
/// each worker.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskUseCase>,
    pub users: Arc<UserUseCase>,
    pub tokens: Arc<dyn TokenService>,
}

/// Malformed or mistyped JSON bodies become `400 {"error": ...}` like every
/// other client error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Registers all routes.
///
/// Reads under `/tasks` need any valid token; writes additionally need the
/// `Admin` role. The read scope is guarded on `GET` and `HEAD` so other
/// methods fall through to the admin scope.
pub fn config(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::from(state.tasks))
            .app_data(web::Data::from(state.users))
            .app_data(json_config())
            .service(health::health)
            .service(
                web::scope("/user")
                    .service(user::register)
                    .service(user::login),
            )
            .service(
                web::scope("/tasks")
                    .guard(guard::Any(guard::Get()).or(guard::Head()))
                    .wrap(Authenticate::new(state.tokens.clone()))
                    .service(tasks::get_tasks)
                    .service(tasks::get_task),
            )
            .service(
                web::scope("/tasks")
                    .wrap(AuthorizeRole::admin())
                    .wrap(Authenticate::new(state.tokens))
                    .service(tasks::create_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            );
    }
}
