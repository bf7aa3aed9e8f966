use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Status given to projects and tasks created without one.
pub const DEFAULT_STATUS: &str = "Not started";
/// Role given to participants added without one.
pub const DEFAULT_PARTICIPANT_ROLE: &str = "participant";

/// Request body for creating or updating a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    /// Defaults to "Not started" on creation; left unchanged on update when absent.
    pub status: Option<String>,
    /// Defaults to the creation time when absent.
    pub start_date: Option<DateTime<Utc>>,
    pub deadline: DateTime<Utc>,
}

/// Write model of a project, always scoped to its manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Zero for a project that has not been inserted yet.
    pub id: i32,
    pub manager_id: i32,
    pub name: String,
    pub description: String,
    pub department: String,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline: DateTime<Utc>,
}

impl Project {
    pub fn new(input: ProjectInput, manager_id: i32) -> Self {
        Self::with_id(0, input, manager_id)
    }

    pub fn with_id(id: i32, input: ProjectInput, manager_id: i32) -> Self {
        Self {
            id,
            manager_id,
            name: input.name,
            description: input.description,
            department: input.department,
            status: input.status.filter(|status| !status.is_empty()),
            start_date: input.start_date,
            deadline: input.deadline,
        }
    }
}

/// Read model returned by project listings, with the manager's first name joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub department: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub manager_name: String,
}

/// Request body for `POST /project/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantInput {
    pub participant_id: i32,
    pub project_id: i32,
    pub role: Option<String>,
}

/// Join row linking a user to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectParticipant {
    pub participant_id: i32,
    pub project_id: i32,
    pub role: String,
}

impl From<ParticipantInput> for ProjectParticipant {
    fn from(input: ParticipantInput) -> Self {
        Self {
            participant_id: input.participant_id,
            project_id: input.project_id,
            role: input
                .role
                .filter(|role| !role.is_empty())
                .unwrap_or_else(|| DEFAULT_PARTICIPANT_ROLE.to_string()),
        }
    }
}
