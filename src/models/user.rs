use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `users` table.
///
/// The password hash is loaded (sign-in needs it) but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Stored file name of the profile photo; empty when none was uploaded.
    #[serde(rename = "path", skip_serializing_if = "String::is_empty")]
    pub photo: String,
    pub role: String,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Everything needed to insert a user; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Fields a user may rewrite on their own account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
}

/// One of the caller's project memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ParticipationView {
    pub id: i32,
    pub role: String,
    pub project_id: i32,
    pub project_name: String,
}
