use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{UserRepository, TASK_VIEW_SELECT, USER_COLUMNS};
use crate::error::{AppError, AppResult};
use crate::models::{ParticipationView, TaskView, User, UserUpdate};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND is_active = TRUE",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users
             SET firstname = $2, lastname = $3, email = $4, password_hash = $5, updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(update.firstname)
        .bind(update.lastname)
        .bind(update.email)
        .bind(update.password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("user not found".into()));
        }
        Ok(())
    }

    async fn update_photo(&self, id: i32, photo: &str, updated_at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET photo = $2, updated_at = $3 WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(photo)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("user not found".into()));
        }
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET is_active = FALSE, deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn restore_user(&self, id: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET is_active = TRUE, deleted_at = NULL, updated_at = NOW()
             WHERE id = $1 AND is_active = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_projects(&self, user_id: i32) -> AppResult<Vec<ParticipationView>> {
        let projects = sqlx::query_as::<_, ParticipationView>(
            "SELECT pp.id, pp.role, pp.project_id, p.name AS project_name
             FROM project_participants pp
             INNER JOIN projects p ON pp.project_id = p.id
             WHERE pp.participant_id = $1 AND p.is_active = TRUE
             ORDER BY pp.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_tasks(&self, user_id: i32) -> AppResult<Vec<TaskView>> {
        let sql = format!(
            "{} WHERE t.executor_id = $1 AND t.is_active = TRUE ORDER BY t.id",
            TASK_VIEW_SELECT
        );
        let tasks = sqlx::query_as::<_, TaskView>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }
}
