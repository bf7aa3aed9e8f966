use async_trait::async_trait;
use sqlx::PgPool;

use super::{TaskRepository, TASK_VIEW_SELECT};
use crate::error::{AppError, AppResult};
use crate::models::{Task, TaskView, DEFAULT_STATUS};

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create_task(&self, task: Task) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO tasks (title, description, controller_id, executor_id, status, project_id, deadline)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), $7, $8)
             RETURNING id",
        )
        .bind(task.title)
        .bind(task.description)
        .bind(task.controller_id)
        .bind(task.executor_id)
        .bind(task.status)
        .bind(DEFAULT_STATUS)
        .bind(task.project_id)
        .bind(task.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_tasks(&self, controller_id: i32) -> AppResult<Vec<TaskView>> {
        let sql = format!(
            "{} WHERE t.controller_id = $1 AND t.is_active = TRUE ORDER BY t.id",
            TASK_VIEW_SELECT
        );
        let tasks = sqlx::query_as::<_, TaskView>(&sql)
            .bind(controller_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn get_task_by_id(&self, controller_id: i32, task_id: i32) -> AppResult<TaskView> {
        let sql = format!(
            "{} WHERE t.controller_id = $1 AND t.id = $2 AND t.is_active = TRUE",
            TASK_VIEW_SELECT
        );
        let task = sqlx::query_as::<_, TaskView>(&sql)
            .bind(controller_id)
            .bind(task_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE tasks
             SET title = $3, description = $4, executor_id = $5, status = COALESCE($6, status),
                 project_id = $7, deadline = $8, updated_at = NOW()
             WHERE id = $1 AND controller_id = $2 AND is_active = TRUE",
        )
        .bind(task.id)
        .bind(task.controller_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.executor_id)
        .bind(task.status)
        .bind(task.project_id)
        .bind(task.deadline)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".into()));
        }
        Ok(())
    }

    async fn delete_task(&self, controller_id: i32, task_id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE tasks SET is_active = FALSE, deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND controller_id = $2 AND is_active = TRUE",
        )
        .bind(task_id)
        .bind(controller_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn restore_task(&self, controller_id: i32, task_id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE tasks SET is_active = TRUE, deleted_at = NULL, updated_at = NOW()
             WHERE id = $1 AND controller_id = $2 AND is_active = FALSE",
        )
        .bind(task_id)
        .bind(controller_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
