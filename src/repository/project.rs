use async_trait::async_trait;
use sqlx::PgPool;

use super::ProjectRepository;
use crate::error::{AppError, AppResult};
use crate::models::{Project, ProjectParticipant, ProjectView, DEFAULT_STATUS};

const PROJECT_VIEW_SELECT: &str = "SELECT p.id, p.name, p.description, p.department, p.status, \
     p.start_date, p.deadline, u.firstname AS manager_name \
     FROM projects p \
     INNER JOIN users u ON p.manager_id = u.id";

pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list(&self, manager_id: i32, active: bool) -> AppResult<Vec<ProjectView>> {
        let sql = format!(
            "{} WHERE p.manager_id = $1 AND p.is_active = $2 ORDER BY p.id",
            PROJECT_VIEW_SELECT
        );
        let projects = sqlx::query_as::<_, ProjectView>(&sql)
            .bind(manager_id)
            .bind(active)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create_project(&self, project: Project) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO projects (name, description, department, manager_id, status, start_date, deadline)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), COALESCE($7, NOW()), $8)
             RETURNING id",
        )
        .bind(project.name)
        .bind(project.description)
        .bind(project.department)
        .bind(project.manager_id)
        .bind(project.status)
        .bind(DEFAULT_STATUS)
        .bind(project.start_date)
        .bind(project.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_all_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>> {
        self.list(manager_id, true).await
    }

    async fn get_project_by_id(&self, manager_id: i32, project_id: i32) -> AppResult<ProjectView> {
        let sql = format!(
            "{} WHERE p.is_active = TRUE AND p.manager_id = $1 AND p.id = $2",
            PROJECT_VIEW_SELECT
        );
        let project = sqlx::query_as::<_, ProjectView>(&sql)
            .bind(manager_id)
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(project)
    }

    async fn update_project(&self, project: Project) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE projects
             SET name = $3, description = $4, department = $5,
                 status = COALESCE($6, status), start_date = COALESCE($7, start_date),
                 deadline = $8, updated_at = NOW()
             WHERE id = $1 AND manager_id = $2 AND is_active = TRUE",
        )
        .bind(project.id)
        .bind(project.manager_id)
        .bind(project.name)
        .bind(project.description)
        .bind(project.department)
        .bind(project.status)
        .bind(project.start_date)
        .bind(project.deadline)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("project not found".into()));
        }
        Ok(())
    }

    async fn delete_project(&self, manager_id: i32, project_id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE projects SET is_active = FALSE, deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND manager_id = $2 AND is_active = TRUE",
        )
        .bind(project_id)
        .bind(manager_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_deleted_projects(&self, manager_id: i32) -> AppResult<Vec<ProjectView>> {
        self.list(manager_id, false).await
    }

    async fn restore_project(&self, manager_id: i32, project_id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE projects SET is_active = TRUE, deleted_at = NULL, updated_at = NOW()
             WHERE id = $1 AND manager_id = $2 AND is_active = FALSE",
        )
        .bind(project_id)
        .bind(manager_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_user_to_project(
        &self,
        manager_id: i32,
        participant: ProjectParticipant,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "INSERT INTO project_participants (participant_id, project_id, role)
             SELECT $1, $2, $3
             WHERE EXISTS (
                 SELECT 1 FROM projects WHERE id = $2 AND manager_id = $4 AND is_active = TRUE
             )",
        )
        .bind(participant.participant_id)
        .bind(participant.project_id)
        .bind(participant.role)
        .bind(manager_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("project not found".into()));
        }
        Ok(())
    }
}
