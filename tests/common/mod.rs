//! In-memory storage and app wiring shared by the integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use projectdesk::auth::{hash_password, TokenSettings};
use projectdesk::error::{AppError, AppResult};
use projectdesk::models::{
    NewUser, ParticipationView, Project, ProjectParticipant, ProjectView, Task, TaskView, User,
    UserUpdate, DEFAULT_STATUS,
};
use projectdesk::repository::{
    AuthRepository, ProjectRepository, Repository, TaskRepository, UserRepository,
};
use projectdesk::routes;
use projectdesk::services::Services;

pub const SECRET: &str = "integration-secret";
pub const BCRYPT_COST: u32 = 4;
pub const MAX_PHOTO_BYTES: usize = 1024;

struct ProjectRow {
    id: i32,
    manager_id: i32,
    name: String,
    description: String,
    department: String,
    status: String,
    start_date: DateTime<Utc>,
    deadline: DateTime<Utc>,
    is_active: bool,
}

struct ParticipantRow {
    id: i32,
    participant_id: i32,
    project_id: i32,
    role: String,
}

struct TaskRow {
    id: i32,
    title: String,
    description: String,
    controller_id: i32,
    executor_id: i32,
    status: String,
    project_id: i32,
    deadline: DateTime<Utc>,
    is_active: bool,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<ProjectRow>,
    participants: Vec<ParticipantRow>,
    tasks: Vec<TaskRow>,
}

fn not_found() -> AppError {
    AppError::NotFound("no rows in result set".into())
}

impl Tables {
    fn firstname(&self, user_id: i32) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.firstname.clone())
            .unwrap_or_default()
    }

    fn project_view(&self, row: &ProjectRow) -> ProjectView {
        ProjectView {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            department: row.department.clone(),
            status: row.status.clone(),
            start_date: row.start_date,
            deadline: row.deadline,
            manager_name: self.firstname(row.manager_id),
        }
    }

    fn task_view(&self, row: &TaskRow) -> TaskView {
        TaskView {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            executor_name: self.firstname(row.executor_id),
            status: row.status.clone(),
            project_name: self
                .projects
                .iter()
                .find(|p| p.id == row.project_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            deadline: row.deadline,
        }
    }
}

/// Mirrors the PostgreSQL repositories: serial ids, soft delete, owner-scoped predicates.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repository(self: &Arc<Self>) -> Repository {
        Repository {
            auth: self.clone(),
            users: self.clone(),
            projects: self.clone(),
            tasks: self.clone(),
        }
    }

    /// Inserts an account directly, as the startup seed does for the superuser.
    pub fn seed_user(&self, firstname: &str, email: &str, password: &str, role: &str) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.users.len() as i32 + 1;
        let now = Utc::now();
        tables.users.push(User {
            id,
            firstname: firstname.to_string(),
            lastname: "Seeded".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password, BCRYPT_COST).unwrap(),
            photo: String::new(),
            role: role.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        id
    }

    pub fn user(&self, id: i32) -> User {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.id == id).cloned().unwrap()
    }
}

#[async_trait]
impl AuthRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> AppResult<i32> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DatabaseError("duplicate key value".into()));
        }
        let id = tables.users.len() as i32 + 1;
        let now = Utc::now();
        tables.users.push(User {
            id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            password_hash: user.password_hash,
            photo: String::new(),
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn is_email_used(&self, email: &str) -> AppResult<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().any(|u| u.email == email))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        let tables = self.tables.lock().unwrap();
        tables
            .users
            .iter()
            .find(|u| u.id == id && u.is_active)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.is_active)
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;
        user.firstname = update.firstname;
        user.lastname = update.lastname;
        user.email = update.email;
        user.password_hash = update.password_hash;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_photo(&self, id: i32, photo: &str, updated_at: DateTime<Utc>) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.is_active)
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;
        user.photo = photo.to_string();
        user.updated_at = updated_at;
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id && u.is_active) {
            user.is_active = false;
            user.deleted_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn restore_user(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id && !u.is_active) {
            user.is_active = true;
            user.deleted_at = None;
        }
        Ok(())
    }

    async fn get_projects(&self, user_id: i32) -> AppResult<Vec<ParticipationView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .participants
            .iter()
            .filter(|pp| pp.participant_id == user_id)
            .filter_map(|pp| {
                tables
                    .projects
                    .iter()
                    .find(|p| p.id == pp.project_id && p.is_active)
                    .map(|p| ParticipationView {
                        id: pp.id,
                        role: pp.role.clone(),
                        project_id: p.id,
                        project_name: p.name.clone(),
                    })
            })
            .collect())
    }

    async fn get_tasks(&self, user_id: i32) -> AppResult<Vec<TaskView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.executor_id == user_id && t.is_active)
            .map(|t| tables.task_view(t))
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create_project(&self, project: Project) -> AppResult<i32> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.projects.len() as i32 + 1;
        tables.projects.push(ProjectRow {
            id,
            manager_id: project.manager_id,
            name: project.name,
            description: project.description,
            department: project.department,
            status: project.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            start_date: project.start_date.unwrap_or_else(Utc::now),
            deadline: project.deadline,
            is_active: true,
        });
        Ok(id)
    }

    async fn get_all_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.manager_id == manager_id && p.is_active)
            .map(|p| tables.project_view(p))
            .collect())
    }

    async fn get_project_by_id(&self, manager_id: i32, project_id: i32) -> AppResult<ProjectView> {
        let tables = self.tables.lock().unwrap();
        tables
            .projects
            .iter()
            .find(|p| p.id == project_id && p.manager_id == manager_id && p.is_active)
            .map(|p| tables.project_view(p))
            .ok_or_else(not_found)
    }

    async fn update_project(&self, project: Project) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .projects
            .iter_mut()
            .find(|p| p.id == project.id && p.manager_id == project.manager_id && p.is_active)
            .ok_or_else(|| AppError::NotFound("project not found".into()))?;
        row.name = project.name;
        row.description = project.description;
        row.department = project.department;
        if let Some(status) = project.status {
            row.status = status;
        }
        if let Some(start_date) = project.start_date {
            row.start_date = start_date;
        }
        row.deadline = project.deadline;
        Ok(())
    }

    async fn delete_project(&self, manager_id: i32, project_id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables
            .projects
            .iter_mut()
            .find(|p| p.id == project_id && p.manager_id == manager_id && p.is_active)
        {
            row.is_active = false;
        }
        Ok(())
    }

    async fn get_deleted_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.manager_id == manager_id && !p.is_active)
            .map(|p| tables.project_view(p))
            .collect())
    }

    async fn restore_project(&self, manager_id: i32, project_id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables
            .projects
            .iter_mut()
            .find(|p| p.id == project_id && p.manager_id == manager_id && !p.is_active)
        {
            row.is_active = true;
        }
        Ok(())
    }

    async fn add_user_to_project(
        &self,
        manager_id: i32,
        participant: ProjectParticipant,
    ) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let owned = tables.projects.iter().any(|p| {
            p.id == participant.project_id && p.manager_id == manager_id && p.is_active
        });
        if !owned {
            return Err(AppError::NotFound("project not found".into()));
        }
        let id = tables.participants.len() as i32 + 1;
        tables.participants.push(ParticipantRow {
            id,
            participant_id: participant.participant_id,
            project_id: participant.project_id,
            role: participant.role,
        });
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create_task(&self, task: Task) -> AppResult<i32> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.tasks.len() as i32 + 1;
        tables.tasks.push(TaskRow {
            id,
            title: task.title,
            description: task.description,
            controller_id: task.controller_id,
            executor_id: task.executor_id,
            status: task.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            project_id: task.project_id,
            deadline: task.deadline,
            is_active: true,
        });
        Ok(id)
    }

    async fn get_tasks(&self, controller_id: i32) -> AppResult<Vec<TaskView>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.controller_id == controller_id && t.is_active)
            .map(|t| tables.task_view(t))
            .collect())
    }

    async fn get_task_by_id(&self, controller_id: i32, task_id: i32) -> AppResult<TaskView> {
        let tables = self.tables.lock().unwrap();
        tables
            .tasks
            .iter()
            .find(|t| t.id == task_id && t.controller_id == controller_id && t.is_active)
            .map(|t| tables.task_view(t))
            .ok_or_else(not_found)
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id && t.controller_id == task.controller_id && t.is_active)
            .ok_or_else(|| AppError::NotFound("task not found".into()))?;
        row.title = task.title;
        row.description = task.description;
        row.executor_id = task.executor_id;
        if let Some(status) = task.status {
            row.status = status;
        }
        row.project_id = task.project_id;
        row.deadline = task.deadline;
        Ok(())
    }

    async fn delete_task(&self, controller_id: i32, task_id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.controller_id == controller_id && t.is_active)
        {
            row.is_active = false;
        }
        Ok(())
    }

    async fn restore_task(&self, controller_id: i32, task_id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.controller_id == controller_id && !t.is_active)
        {
            row.is_active = true;
        }
        Ok(())
    }
}

pub fn token_settings() -> TokenSettings {
    TokenSettings::new(SECRET, Duration::minutes(15))
}

/// A fresh upload directory per test.
pub fn upload_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "projectdesk-it-{}-{}",
        name,
        Utc::now().timestamp_nanos_opt().unwrap()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn services(store: &Arc<MemoryStore>, upload_dir: PathBuf) -> Services {
    Services::new(store.repository(), token_settings(), BCRYPT_COST, upload_dir)
}

pub async fn init_app(
    store: &Arc<MemoryStore>,
    upload_dir: PathBuf,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let services = services(store, upload_dir);
    test::init_service(
        App::new().configure(move |cfg| routes::config(cfg, services, MAX_PHOTO_BYTES)),
    )
    .await
}

pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap()
}
