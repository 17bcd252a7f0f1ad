use crate::{
    auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::AppError,
    usecases::UserUseCase,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a `User`-role account. The response carries the stored account
/// (`id`, `username`, `role`) but never its password hash.
///
/// ## Responses:
/// - `201 Created`: The account was created.
/// - `400 Bad Request`: Malformed body or a username/password failing validation.
/// - `409 Conflict`: The username is already registered.
#[post("/register")]
pub async fn register(
    users: web::Data<UserUseCase>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = users
        .register_user(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Authenticates a user and returns a signed token. Unknown usernames and
/// wrong passwords are indistinguishable to the caller.
#[post("/login")]
pub async fn login(
    users: web::Data<UserUseCase>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = users
        .login(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
