use std::sync::Arc;

use async_trait::async_trait;

use super::TaskService;
use crate::error::AppResult;
use crate::models::{Task, TaskView};
use crate::repository::TaskRepository;

/// Tasks are scoped to their controller by the repository queries themselves.
pub struct TaskManager {
    repo: Arc<dyn TaskRepository>,
}

impl TaskManager {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TaskService for TaskManager {
    async fn create_task(&self, task: Task) -> AppResult<i32> {
        let controller_id = task.controller_id;
        let id = self.repo.create_task(task).await?;
        log::info!("controller {} created task {}", controller_id, id);
        Ok(id)
    }

    async fn get_all_tasks(&self, controller_id: i32) -> AppResult<Vec<TaskView>> {
        self.repo.get_tasks(controller_id).await
    }

    async fn get_task_by_id(&self, controller_id: i32, task_id: i32) -> AppResult<TaskView> {
        self.repo.get_task_by_id(controller_id, task_id).await
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        self.repo.update_task(task).await
    }

    async fn delete_task(&self, controller_id: i32, task_id: i32) -> AppResult<()> {
        self.repo.delete_task(controller_id, task_id).await
    }

    async fn restore_task(&self, controller_id: i32, task_id: i32) -> AppResult<()> {
        self.repo.restore_task(controller_id, task_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repository::MockTaskRepository;
    use chrono::Utc;

    #[actix_rt::test]
    async fn test_create_task_returns_new_id() {
        let mut repo = MockTaskRepository::new();
        repo.expect_create_task()
            .withf(|task| task.controller_id == 1 && task.executor_id == 2)
            .returning(|_| Ok(17));

        let task = Task {
            id: 0,
            title: "Write report".to_string(),
            description: "Quarterly".to_string(),
            controller_id: 1,
            executor_id: 2,
            status: None,
            project_id: 3,
            deadline: Utc::now(),
        };
        assert_eq!(TaskManager::new(Arc::new(repo)).create_task(task).await.unwrap(), 17);
    }

    #[actix_rt::test]
    async fn test_lookups_are_scoped_to_controller() {
        let mut repo = MockTaskRepository::new();
        repo.expect_get_task_by_id()
            .withf(|controller, id| *controller == 1 && *id == 4)
            .returning(|_, _| Err(AppError::NotFound("no rows in result set".into())));

        let result = TaskManager::new(Arc::new(repo)).get_task_by_id(1, 4).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
