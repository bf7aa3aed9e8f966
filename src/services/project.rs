use std::sync::Arc;

use async_trait::async_trait;

use super::ProjectService;
use crate::error::{AppError, AppResult};
use crate::models::{Project, ProjectParticipant, ProjectView};
use crate::repository::ProjectRepository;

pub struct ProjectManager {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectManager {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ProjectService for ProjectManager {
    async fn create_project(&self, project: Project) -> AppResult<i32> {
        let manager_id = project.manager_id;
        let id = self.repo.create_project(project).await?;
        log::info!("manager {} created project {}", manager_id, id);
        Ok(id)
    }

    async fn get_all_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>> {
        self.repo.get_all_projects(manager_id).await
    }

    async fn get_project_by_id(&self, manager_id: i32, project_id: i32) -> AppResult<ProjectView> {
        self.repo.get_project_by_id(manager_id, project_id).await
    }

    async fn update_project(&self, project: Project) -> AppResult<()> {
        // Ownership is confirmed before the write; the update predicate repeats the check.
        self.repo
            .get_project_by_id(project.manager_id, project.id)
            .await?;
        self.repo.update_project(project).await
    }

    async fn delete_project(&self, manager_id: i32, project_id: i32) -> AppResult<()> {
        self.repo.delete_project(manager_id, project_id).await
    }

    async fn get_deleted_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>> {
        self.repo.get_deleted_projects(manager_id).await
    }

    async fn restore_project(&self, manager_id: i32, project_id: i32) -> AppResult<()> {
        self.repo.restore_project(manager_id, project_id).await
    }

    async fn add_user_to_project(
        &self,
        manager_id: i32,
        participant: ProjectParticipant,
    ) -> AppResult<()> {
        if participant.participant_id == manager_id {
            return Err(AppError::BadRequest(
                "the manager cannot be added as a participant".into(),
            ));
        }

        self.repo
            .get_project_by_id(manager_id, participant.project_id)
            .await?;
        self.repo.add_user_to_project(manager_id, participant).await
    }
}
