use async_trait::async_trait;
use sqlx::PgPool;

use super::{AuthRepository, USER_COLUMNS};
use crate::error::AppResult;
use crate::models::{NewUser, User};

pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    async fn create_user(&self, user: NewUser) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (firstname, lastname, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(user.firstname)
        .bind(user.lastname)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn is_email_used(&self, email: &str) -> AppResult<bool> {
        let used = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(used)
    }
}
