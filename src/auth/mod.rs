pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims, TokenSettings};

/// Header scheme expected by the authentication gate: `Authorization: Alif <token>`.
pub const AUTH_SCHEME: &str = "Alif";

/// The only role allowed to manage projects and tasks.
pub const SUPERUSER_ROLE: &str = "superuser";
/// Role given to every account created through sign-up.
pub const DEFAULT_ROLE: &str = "user";

lazy_static! {
    // Punctuation a password may not contain.
    static ref PASSWORD_DENYLIST: regex::Regex =
        regex::Regex::new(r#"[_\-@#$%&*():./\\,;?"!~]"#).unwrap();
}

/// Lengths are counted in bytes, so a multi-byte character uses up more of the budget.
fn byte_length(
    value: &str,
    min: usize,
    max: usize,
    code: &'static str,
) -> Result<(), ValidationError> {
    if !(min..=max).contains(&value.len()) {
        return Err(ValidationError::new(code));
    }
    Ok(())
}

fn email_rules(email: &str) -> Result<(), ValidationError> {
    byte_length(email, 5, 30, "email_length")
}

fn password_rules(password: &str) -> Result<(), ValidationError> {
    byte_length(password, 6, 20, "password_length")?;
    if PASSWORD_DENYLIST.is_match(password) {
        return Err(ValidationError::new("password_charset"));
    }
    Ok(())
}

/// Email and password pair checked against the account policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct Credentials {
    /// 5 to 30 bytes.
    #[validate(custom = "email_rules")]
    pub email: String,
    /// 6 to 20 bytes, none of them from the denylist.
    #[validate(custom = "password_rules")]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Applies the account policy; any failure is reported as a bare `forbidden`.
    pub fn check_policy(&self) -> AppResult<()> {
        self.validate()
            .map_err(|_| AppError::Forbidden("forbidden".into()))
    }
}

/// Payload of `POST /auth/sign-up`, also reused by `PUT /user/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl SignUpRequest {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

/// Payload of `POST /auth/sign-in`.
pub type SignInRequest = Credentials;

/// Response body of a successful sign-up.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub id: i32,
}
