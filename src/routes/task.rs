use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput},
    routes::{checked, internal, message, Deferred},
    services::Services,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Creates a task controlled by the caller.
///
/// ## Request Body:
/// - `title`, `description`, `executor_id`, `project_id`, `deadline` (required).
/// - `status` (optional): defaults to `Not started`.
///
/// ## Responses:
/// - `201 Created`: `{"id": <new id>}`.
/// - `400 Bad Request`: role rejection, or `invalid JSON provided` for a body that
///   does not parse or has an empty or overlong title or description.
/// - `500 Internal Server Error`: `failed to create a new task`.
#[post("/")]
pub async fn create_task(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    input: Deferred<web::Json<TaskInput>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("create a task")?;
    let input = checked(input?)?;

    let id = services
        .tasks
        .create_task(Task::new(input, user.id))
        .await
        .map_err(internal("failed to create a new task"))?;

    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// Lists every active task the caller controls, as `{"tasks": [...]}`.
#[get("/")]
pub async fn get_all_tasks(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require_superuser("get all tasks")?;

    let tasks = services
        .tasks
        .get_all_tasks(user.id)
        .await
        .map_err(internal("failed to get the list of tasks"))?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

#[get("/{id}")]
pub async fn get_task_by_id(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    task_id: Deferred<web::Path<i32>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("get a task")?;
    let task_id = task_id?.into_inner();

    let task = services
        .tasks
        .get_task_by_id(user.id, task_id)
        .await
        .map_err(internal("failed to get the task"))?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Rewrites a task the caller controls. An absent `status` keeps the current one.
#[put("/{id}")]
pub async fn update_task(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    task_id: Deferred<web::Path<i32>>,
    input: Deferred<web::Json<TaskInput>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("update a task")?;
    let task_id = task_id?.into_inner();
    let input = checked(input?)?;

    services
        .tasks
        .update_task(Task::with_id(task_id, input, user.id))
        .await
        .map_err(internal("failed to update the task"))?;

    Ok(message("task updated successfully"))
}

#[delete("/{id}")]
pub async fn delete_task(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    task_id: Deferred<web::Path<i32>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("delete a task")?;
    let task_id = task_id?.into_inner();

    services
        .tasks
        .delete_task(user.id, task_id)
        .await
        .map_err(internal("failed to delete the task"))?;

    Ok(message("task deleted successfully"))
}

#[post("/{id}/restore")]
pub async fn restore_task(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    task_id: Deferred<web::Path<i32>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("restore a task")?;
    let task_id = task_id?.into_inner();

    services
        .tasks
        .restore_task(user.id, task_id)
        .await
        .map_err(internal("failed to restore the task"))?;

    Ok(message("task restored successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskView;
    use crate::routes::testing::{app_with, authenticated_as, body_json, Mocks};
    use actix_web::test;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn task_body() -> serde_json::Value {
        json!({
            "title": "Write report",
            "description": "Quarterly numbers",
            "executor_id": 3,
            "project_id": 7,
            "deadline": "2030-01-01T00:00:00Z"
        })
    }

    fn superuser() -> Mocks {
        Mocks {
            auth: authenticated_as(1, "SuperUser"),
            ..Mocks::default()
        }
    }

    #[actix_rt::test]
    async fn test_regular_user_cannot_list_tasks() {
        let mut mocks = Mocks {
            auth: authenticated_as(2, "user"),
            ..Mocks::default()
        };
        mocks.tasks.expect_get_all_tasks().never();

        let app = app_with(mocks).await;
        let req = test::TestRequest::get()
            .uri("/v1/task/")
            .insert_header(("Authorization", "Alif token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "You are not allowed to get all tasks" })
        );
    }

    #[actix_rt::test]
    async fn test_regular_user_is_rejected_before_the_path() {
        let mut mocks = Mocks {
            auth: authenticated_as(2, "user"),
            ..Mocks::default()
        };
        mocks.tasks.expect_delete_task().never();

        let app = app_with(mocks).await;
        let req = test::TestRequest::delete()
            .uri("/v1/task/abc")
            .insert_header(("Authorization", "Alif token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "You are not allowed to delete a task" })
        );
    }

    #[actix_rt::test]
    async fn test_overlong_title_is_rejected() {
        let mut mocks = superuser();
        mocks.tasks.expect_create_task().never();

        let mut body = task_body();
        body["title"] = json!("a".repeat(201));

        let app = app_with(mocks).await;
        let req = test::TestRequest::post()
            .uri("/v1/task/")
            .insert_header(("Authorization", "Alif token"))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_eq!(body_json(resp).await, json!({ "error": "invalid JSON provided" }));
    }

    #[actix_rt::test]
    async fn test_create_task_as_controller() {
        let mut mocks = superuser();
        mocks
            .tasks
            .expect_create_task()
            .withf(|task| task.controller_id == 1 && task.executor_id == 3 && task.project_id == 7)
            .returning(|_| Ok(21));

        let app = app_with(mocks).await;
        let req = test::TestRequest::post()
            .uri("/v1/task/")
            .insert_header(("Authorization", "Alif token"))
            .set_json(task_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        assert_eq!(body_json(resp).await, json!({ "id": 21 }));
    }

    #[actix_rt::test]
    async fn test_update_task_carries_path_id() {
        let mut mocks = superuser();
        mocks
            .tasks
            .expect_update_task()
            .withf(|task| task.id == 5 && task.controller_id == 1)
            .returning(|_| Ok(()));

        let app = app_with(mocks).await;
        let req = test::TestRequest::put()
            .uri("/v1/task/5")
            .insert_header(("Authorization", "Alif token"))
            .set_json(task_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(body_json(resp).await, json!({ "message": "task updated successfully" }));
    }

    #[actix_rt::test]
    async fn test_list_tasks() {
        let mut mocks = superuser();
        mocks.tasks.expect_get_all_tasks().returning(|_| {
            Ok(vec![TaskView {
                id: 5,
                title: "Write report".to_string(),
                description: "Quarterly numbers".to_string(),
                executor_name: "Test".to_string(),
                status: "Not started".to_string(),
                project_name: "Apollo".to_string(),
                deadline: Utc::now(),
            }])
        });

        let app = app_with(mocks).await;
        let req = test::TestRequest::get()
            .uri("/v1/task/")
            .insert_header(("Authorization", "Alif token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let body = body_json(resp).await;
        assert_eq!(body["tasks"][0]["executor_name"], "Test");
        assert_eq!(body["tasks"][0]["project_name"], "Apollo");
    }

    #[actix_rt::test]
    async fn test_restore_task() {
        let mut mocks = superuser();
        mocks
            .tasks
            .expect_restore_task()
            .withf(|controller, id| *controller == 1 && *id == 5)
            .returning(|_, _| Ok(()));

        let app = app_with(mocks).await;
        let req = test::TestRequest::post()
            .uri("/v1/task/5/restore")
            .insert_header(("Authorization", "Alif token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(body_json(resp).await, json!({ "message": "task restored successfully" }));
    }
}
