//! Storage layer.
//!
//! One trait per entity, each backed by a PostgreSQL implementation. Soft delete is a
//! flag flip: reads filter on `is_active = TRUE`, delete/restore toggle the flag and
//! report success even when no row changed.

mod auth;
mod project;
mod task;
mod user;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{
    NewUser, ParticipationView, Project, ProjectParticipant, ProjectView, Task, TaskView, User,
    UserUpdate,
};

pub use auth::PgAuthRepository;
pub use project::PgProjectRepository;
pub use task::PgTaskRepository;
pub use user::PgUserRepository;

#[cfg(test)]
use mockall::automock;

/// Account lookups used by sign-up and sign-in. These ignore the active flag.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> AppResult<i32>;

    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    async fn is_email_used(&self, email: &str) -> AppResult<bool>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    async fn update_user(&self, id: i32, update: UserUpdate) -> AppResult<()>;

    async fn update_photo(&self, id: i32, photo: &str, updated_at: DateTime<Utc>) -> AppResult<()>;

    async fn delete_user(&self, id: i32) -> AppResult<()>;

    async fn restore_user(&self, id: i32) -> AppResult<()>;

    /// Projects the user participates in.
    async fn get_projects(&self, user_id: i32) -> AppResult<Vec<ParticipationView>>;

    /// Active tasks where the user is the executor.
    async fn get_tasks(&self, user_id: i32) -> AppResult<Vec<TaskView>>;
}

/// Every method is scoped to the manager that owns the project.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: Project) -> AppResult<i32>;

    async fn get_all_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>>;

    async fn get_project_by_id(&self, manager_id: i32, project_id: i32) -> AppResult<ProjectView>;

    async fn update_project(&self, project: Project) -> AppResult<()>;

    async fn delete_project(&self, manager_id: i32, project_id: i32) -> AppResult<()>;

    async fn get_deleted_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>>;

    async fn restore_project(&self, manager_id: i32, project_id: i32) -> AppResult<()>;

    /// Inserts the join row only if the project is still active and owned by `manager_id`.
    async fn add_user_to_project(
        &self,
        manager_id: i32,
        participant: ProjectParticipant,
    ) -> AppResult<()>;
}

/// Every method is scoped to the controller (creator) of the task.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: Task) -> AppResult<i32>;

    async fn get_tasks(&self, controller_id: i32) -> AppResult<Vec<TaskView>>;

    async fn get_task_by_id(&self, controller_id: i32, task_id: i32) -> AppResult<TaskView>;

    async fn update_task(&self, task: Task) -> AppResult<()>;

    async fn delete_task(&self, controller_id: i32, task_id: i32) -> AppResult<()>;

    async fn restore_task(&self, controller_id: i32, task_id: i32) -> AppResult<()>;
}

/// All repositories sharing one connection pool.
#[derive(Clone)]
pub struct Repository {
    pub auth: Arc<dyn AuthRepository>,
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            auth: Arc::new(PgAuthRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool)),
        }
    }
}

/// Columns selected whenever a full `User` row is loaded.
pub(crate) const USER_COLUMNS: &str = "id, firstname, lastname, email, password_hash, photo, role, \
     is_active, created_at, updated_at, deleted_at";

/// Task read model: executor first name and project name joined in.
pub(crate) const TASK_VIEW_SELECT: &str = "SELECT t.id, t.title, t.description, \
     u.firstname AS executor_name, t.status, p.name AS project_name, t.deadline \
     FROM tasks t \
     INNER JOIN users u ON t.executor_id = u.id \
     INNER JOIN projects p ON t.project_id = p.id";
