//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler and store operation returns it, and `AppError` implements
//! `actix_web::error::ResponseError` so it turns into a JSON response with an `error` field.
//!
//! Server-side failures (store, hashing, signing) are logged with their detail and
//! answered with a generic message; nothing internal reaches the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Body text for every 500-class response.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Why a request was refused with 401.
///
/// Credential failures share a single message on purpose: a wrong password and an
/// unknown email must be indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No token was supplied with a request to a protected route.
    TokenMissing,
    /// The token was malformed, badly signed or expired.
    TokenInvalid,
    /// Login email/password did not match an active user.
    InvalidCredentials,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::TokenMissing => "Unauthorized - Token not provided",
            AuthFailure::TokenInvalid => "Unauthorized - Invalid token",
            AuthFailure::InvalidCredentials => "Invalid email or password",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is missing, invalid, or the credentials were wrong (HTTP 401).
    Unauthorized(AuthFailure),
    /// The request could not be decoded, e.g. malformed JSON or a missing field (HTTP 400).
    BadRequest(String),
    /// Field-level validation failed (HTTP 400). The details are returned to the client.
    ValidationError(ValidationErrors),
    /// The resource would collide with an existing one, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// The requested resource does not exist or is not visible to the caller (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the backing store (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(reason) => write!(f, "Unauthorized: {}", reason),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthorized(reason) => json!({ "error": reason.message() }),
            AppError::BadRequest(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => {
                json!({ "error": msg })
            }
            AppError::ValidationError(errors) => json!({ "error": { "details": errors } }),
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}", msg);
                json!({ "error": INTERNAL_ERROR_MESSAGE })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, unique-constraint violations become `Conflict`,
/// and everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Record already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::ValidationError(errors)
    }
}

/// Any JWT failure (signature, format, expiry) is reported as an invalid token.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(AuthFailure::TokenInvalid)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
