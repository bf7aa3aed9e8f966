use std::sync::Arc;

use async_trait::async_trait;

use super::AuthService;
use crate::auth::{
    generate_token, hash_password, verify_password, verify_token, Credentials, SignUpRequest,
    TokenSettings, DEFAULT_ROLE,
};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::repository::AuthRepository;

/// Sign-up, sign-in and token handling.
pub struct Authenticator {
    repo: Arc<dyn AuthRepository>,
    tokens: TokenSettings,
    bcrypt_cost: u32,
}

impl Authenticator {
    pub fn new(repo: Arc<dyn AuthRepository>, tokens: TokenSettings, bcrypt_cost: u32) -> Self {
        Self {
            repo,
            tokens,
            bcrypt_cost,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    fn validate_user(&self, credentials: &Credentials) -> AppResult<()> {
        credentials.check_policy()
    }

    async fn is_email_used(&self, email: &str) -> AppResult<bool> {
        self.repo.is_email_used(email).await
    }

    async fn create_user(&self, request: SignUpRequest) -> AppResult<i32> {
        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let user = NewUser {
            firstname: request.firstname,
            lastname: request.lastname,
            email: request.email,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        };

        let id = self.repo.create_user(user).await.map_err(|err| {
            log::error!("failed to create user: {}", err);
            err
        })?;
        log::info!("user {} signed up", id);
        Ok(id)
    }

    async fn check_user(&self, credentials: &Credentials) -> AppResult<User> {
        let user = self.repo.get_user_by_email(&credentials.email).await?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            log::debug!("password mismatch for user {}", user.id);
            return Err(AppError::BadRequest("invalid email or password".into()));
        }
        Ok(user)
    }

    fn generate_token(&self, user: &User) -> AppResult<String> {
        generate_token(&self.tokens, user.id, &user.role)
    }

    fn parse_token(&self, token: &str) -> AppResult<(i32, String)> {
        let claims = verify_token(&self.tokens, token)?;
        Ok((claims.user_id, claims.user_role))
    }
}
