//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every layer (repositories, services, handlers, the auth gate) returns `AppResult<T>`,
//! so failures travel up with `?` and are rendered exactly once, at the HTTP boundary.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application errors
//! into HTTP responses with JSON bodies. `From` implementations exist for `sqlx::Error`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError`, `actix_multipart::MultipartError`
//! and `std::io::Error`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Shorthand used by every fallible function in the crate.
pub type AppResult<T> = Result<T, AppError>;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The `Authorization` header itself is absent or malformed (HTTP 401).
    /// Rendered under a `reason` key rather than `error`.
    #[error("Invalid auth header: {0}")]
    InvalidAuthHeader(String),
    /// Malformed or invalid request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Input rejected by policy (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Requested row does not exist or does not match the caller's scope (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Uploaded file type is not accepted (HTTP 415).
    #[error("Unsupported Media Type: {0}")]
    UnsupportedMediaType(String),
    /// Unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Error originating from database operations (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl AppError {
    /// The message carried by the variant, without the display prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::InvalidAuthHeader(msg)
            | AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::UnsupportedMediaType(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => msg,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidAuthHeader(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            // Database errors are also presented as generic internal server errors to the client.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InvalidAuthHeader(reason) => json!({ "reason": reason }),
            other => json!({ "error": other.message() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// `sqlx::Error::RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("no rows in result set".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Token processing failures are authentication failures; the library's message is kept.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(error: actix_multipart::MultipartError) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
