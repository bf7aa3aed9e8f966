use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::SUPERUSER_ROLE;
use crate::error::AppError;

/// Identity of the caller, placed in request extensions by `AuthMiddleware`.
///
/// Handlers on routes behind the gate take this as an argument. If the gate did
/// not run the extractor fails with `AppError::InternalServerError`, mirroring a
/// missing context value rather than a client mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_superuser(&self) -> bool {
        self.role.eq_ignore_ascii_case(SUPERUSER_ROLE)
    }

    /// Rejects non-superusers with `You are not allowed to <action>`.
    pub fn require_superuser(&self, action: &str) -> Result<(), AppError> {
        if self.is_superuser() {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!("You are not allowed to {}", action)))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::InternalServerError("userId not found".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
