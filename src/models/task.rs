use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating or updating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 1000))]
    pub description: String,

    /// User the task is assigned to.
    pub executor_id: i32,

    /// Defaults to "Not started" on creation; left unchanged on update when absent.
    pub status: Option<String>,

    pub project_id: i32,

    pub deadline: DateTime<Utc>,
}

/// Write model of a task, always scoped to its controller (creator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Zero for a task that has not been inserted yet.
    pub id: i32,
    pub title: String,
    pub description: String,
    pub controller_id: i32,
    pub executor_id: i32,
    pub status: Option<String>,
    pub project_id: i32,
    pub deadline: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `controller_id`.
    pub fn new(input: TaskInput, controller_id: i32) -> Self {
        Self::with_id(0, input, controller_id)
    }

    pub fn with_id(id: i32, input: TaskInput, controller_id: i32) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            controller_id,
            executor_id: input.executor_id,
            status: input.status.filter(|status| !status.is_empty()),
            project_id: input.project_id,
            deadline: input.deadline,
        }
    }
}

/// Read model of a task with the executor's first name and the project name joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TaskView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub executor_name: String,
    pub status: String,
    pub project_name: String,
    pub deadline: DateTime<Utc>,
}
