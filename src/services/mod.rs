//! Business rules between the HTTP handlers and the repositories.

mod auth;
mod project;
mod task;
mod user;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{Credentials, SignUpRequest, TokenSettings};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{
    ParticipationView, Project, ProjectParticipant, ProjectView, Task, TaskView, User,
};
use crate::repository::Repository;
use crate::upload::PhotoUpload;

pub use auth::Authenticator;
pub use project::ProjectManager;
pub use task::TaskManager;
pub use user::UserManager;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Checks credentials against the account policy, failing with `Forbidden("forbidden")`.
    fn validate_user(&self, credentials: &Credentials) -> AppResult<()>;

    async fn is_email_used(&self, email: &str) -> AppResult<bool>;

    /// Hashes the password and stores a new `user` account, returning its id.
    async fn create_user(&self, request: SignUpRequest) -> AppResult<i32>;

    /// Loads the account by email and verifies the password.
    async fn check_user(&self, credentials: &Credentials) -> AppResult<User>;

    fn generate_token(&self, user: &User) -> AppResult<String>;

    /// Returns `(user_id, role)` for a valid, unexpired token.
    fn parse_token(&self, token: &str) -> AppResult<(i32, String)>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    async fn update_user(&self, id: i32, request: SignUpRequest) -> AppResult<()>;

    async fn delete_user(&self, id: i32) -> AppResult<()>;

    async fn restore_user(&self, id: i32) -> AppResult<()>;

    async fn get_projects(&self, user_id: i32) -> AppResult<Vec<ParticipationView>>;

    async fn get_tasks(&self, user_id: i32) -> AppResult<Vec<TaskView>>;

    /// Stores the first profile photo and returns the updated user.
    async fn upload_photo(&self, id: i32, photo: PhotoUpload) -> AppResult<User>;

    /// Replaces the profile photo, removing the previous file.
    async fn change_photo(&self, id: i32, photo: PhotoUpload) -> AppResult<User>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn create_project(&self, project: Project) -> AppResult<i32>;

    async fn get_all_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>>;

    async fn get_project_by_id(&self, manager_id: i32, project_id: i32) -> AppResult<ProjectView>;

    async fn update_project(&self, project: Project) -> AppResult<()>;

    async fn delete_project(&self, manager_id: i32, project_id: i32) -> AppResult<()>;

    async fn get_deleted_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>>;

    async fn restore_project(&self, manager_id: i32, project_id: i32) -> AppResult<()>;

    async fn add_user_to_project(
        &self,
        manager_id: i32,
        participant: ProjectParticipant,
    ) -> AppResult<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, task: Task) -> AppResult<i32>;

    async fn get_all_tasks(&self, controller_id: i32) -> AppResult<Vec<TaskView>>;

    async fn get_task_by_id(&self, controller_id: i32, task_id: i32) -> AppResult<TaskView>;

    async fn update_task(&self, task: Task) -> AppResult<()>;

    async fn delete_task(&self, controller_id: i32, task_id: i32) -> AppResult<()>;

    async fn restore_task(&self, controller_id: i32, task_id: i32) -> AppResult<()>;
}

/// The service set shared by every worker, registered as `web::Data`.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub projects: Arc<dyn ProjectService>,
    pub tasks: Arc<dyn TaskService>,
}

impl Services {
    pub fn new(
        repository: Repository,
        tokens: TokenSettings,
        bcrypt_cost: u32,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(repository.auth, tokens, bcrypt_cost)),
            users: Arc::new(UserManager::new(repository.users, bcrypt_cost, upload_dir)),
            projects: Arc::new(ProjectManager::new(repository.projects)),
            tasks: Arc::new(TaskManager::new(repository.tasks)),
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Repository::new(pool),
            config.token_settings(),
            config.bcrypt_cost,
            config.upload_dir.clone(),
        )
    }
}
