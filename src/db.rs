use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::{hash_password, SUPERUSER_ROLE};
use crate::config::{Config, SuperuserConfig};
use crate::error::AppResult;

pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Applies the migrations embedded from `./migrations`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Inserts the configured superuser unless an account with that email already exists.
///
/// Returns `true` when a new row was written.
pub async fn seed_superuser(
    pool: &PgPool,
    superuser: &SuperuserConfig,
    bcrypt_cost: u32,
) -> AppResult<bool> {
    let password_hash = hash_password(&superuser.password, bcrypt_cost)?;

    let result = sqlx::query(
        "INSERT INTO users (firstname, lastname, email, password_hash, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(&superuser.firstname)
    .bind(&superuser.lastname)
    .bind(&superuser.email)
    .bind(password_hash)
    .bind(SUPERUSER_ROLE)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
