use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::auth::token::TokenSettings;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;
const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Credentials of the account seeded on every startup.
#[derive(Debug, Clone)]
pub struct SuperuserConfig {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub upload_dir: PathBuf,
    pub max_photo_bytes: usize,
    pub superuser: SuperuserConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_minutes: parsed("TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./files")),
            max_photo_bytes: parsed("MAX_PHOTO_BYTES", DEFAULT_MAX_PHOTO_BYTES)?,
            superuser: SuperuserConfig {
                firstname: env::var("SUPERUSER_FIRSTNAME").unwrap_or_else(|_| "Admin".to_string()),
                lastname: env::var("SUPERUSER_LASTNAME").unwrap_or_else(|_| "Admin".to_string()),
                email: env::var("SUPERUSER_EMAIL")
                    .unwrap_or_else(|_| "admin@projectdesk.local".to_string()),
                password: env::var("SUPERUSER_PASSWORD").unwrap_or_else(|_| "changeme123".to_string()),
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings::new(&self.jwt_secret, chrono::Duration::minutes(self.token_ttl_minutes))
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
