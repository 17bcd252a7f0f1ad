//!
//! # HTTP Error Mapping
//!
//! This module defines `AppError`, the delivery layer's error type. Handlers and
//! middleware return it, and its `actix_web::error::ResponseError`
//! implementation is the single place where failures become status codes and
//! JSON bodies of the form `{"error": "<message>"}`.
//!
//! `From` implementations translate the domain's sentinel errors
//! (`DomainError`), token verification failures (`TokenError`) and request
//! validation failures (`validator::ValidationErrors`) so handlers can use `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::domain::{DomainError, TokenError};

/// Message sent to clients in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Represents all possible errors that can reach an HTTP response.
#[derive(Debug)]
pub enum AppError {
    /// Represents a missing, malformed, invalid or expired credential (HTTP 401).
    Unauthorized(String),
    /// Represents an authenticated caller lacking the required role (HTTP 403).
    Forbidden(String),
    /// Represents a malformed request or a violated domain rule (HTTP 400).
    BadRequest(String),
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// Represents a uniqueness conflict, such as a taken username (HTTP 409).
    Conflict(String),
    /// Represents an unexpected server-side error (HTTP 500).
    /// The detail is logged but never sent to the client.
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.as_str(),
            AppError::InternalServerError(detail) => {
                log::error!("{}", detail);
                INTERNAL_ERROR_MESSAGE
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts the domain's sentinel errors into their transport equivalents.
impl From<DomainError> for AppError {
    fn from(error: DomainError) -> AppError {
        match error {
            DomainError::ValidationFailed(_) => AppError::BadRequest(error.to_string()),
            DomainError::TaskNotFound | DomainError::UserNotFound => {
                AppError::NotFound(error.to_string())
            }
            DomainError::UsernameTaken => AppError::Conflict(error.to_string()),
            DomainError::InvalidCredentials => AppError::Unauthorized(error.to_string()),
            DomainError::Storage(_) | DomainError::Internal(_) => {
                AppError::InternalServerError(error.to_string())
            }
        }
    }
}

/// Token failures are client errors, except a failure to sign.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Signing(_) => AppError::InternalServerError(error.to_string()),
            _ => AppError::Unauthorized(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}
