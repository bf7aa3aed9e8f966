use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user.
    pub user_id: i32,
    /// Role of the user at the time the token was issued.
    pub user_role: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signing material and lifetime for access tokens.
///
/// Built once from `Config` and handed to the authorization service, so
/// token functions never read the process environment.
#[derive(Clone)]
pub struct TokenSettings {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Generates an HS256 token for the given user that expires after `settings.ttl()`.
pub fn generate_token(
    settings: &TokenSettings,
    user_id: i32,
    user_role: &str,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        user_role: user_role.to_string(),
        iat: now.timestamp(),
        exp: (now + settings.ttl).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &settings.encoding_key)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token and returns its claims.
///
/// Only HMAC algorithms are accepted. The library applies its default leeway to
/// `exp`; the expiry is then compared against the current time once more with no
/// leeway, so a token is never accepted past the moment it was issued to expire.
pub fn verify_token(settings: &TokenSettings, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    let claims = decode::<Claims>(token, &settings.decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(AppError::from)?;

    if claims.exp < Utc::now().timestamp() {
        return Err(AppError::Unauthorized("token expired".into()));
    }

    Ok(claims)
}
