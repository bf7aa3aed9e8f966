//! Project management. Every handler requires the `superuser` role and scopes the
//! operation to projects the caller manages. The role is checked before the body or
//! path is looked at.

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ParticipantInput, Project, ProjectInput, ProjectParticipant},
    routes::{bad_request, checked, internal, listing, message, Deferred},
    services::Services,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Creates a project managed by the caller.
///
/// ## Request Body:
/// - `name`, `description`, `department`, `deadline` (required).
/// - `status` (optional): defaults to `Not started`.
/// - `start_date` (optional): defaults to now.
///
/// ## Responses:
/// - `201 Created`: `{"id": <new id>}`.
/// - `400 Bad Request`: role rejection, or `invalid JSON provided` for a body that
///   does not parse or has an empty or overlong field.
/// - `500 Internal Server Error`: `failed to create a new project`.
#[post("/")]
pub async fn create_project(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    input: Deferred<web::Json<ProjectInput>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("create a project")?;
    let input = checked(input?)?;

    let id = services
        .projects
        .create_project(Project::new(input, user.id))
        .await
        .map_err(internal("failed to create a new project"))?;

    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

#[get("/")]
pub async fn get_all_projects(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require_superuser("get all projects")?;

    let projects = services
        .projects
        .get_all_projects(user.id)
        .await
        .map_err(bad_request("failed to get the list of projects"))?;

    Ok(listing("projects", projects, "there is no any project"))
}

#[get("/deleted")]
pub async fn get_deleted_projects(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user.require_superuser("get a list of deleted projects")?;

    let projects = services
        .projects
        .get_deleted_projects(user.id)
        .await
        .map_err(bad_request("failed to get the list of deleted projects"))?;

    Ok(listing("projects", projects, "there is no any deleted project"))
}

/// Adds a participant to one of the caller's projects. `role` defaults to `participant`.
#[post("/users")]
pub async fn add_user_to_project(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    input: Deferred<web::Json<ParticipantInput>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("add participants to a project")?;
    let input = input?.into_inner();

    services
        .projects
        .add_user_to_project(user.id, ProjectParticipant::from(input))
        .await
        .map_err(bad_request("failed to add a new participant to the project"))?;

    Ok(message("added a new participant to the project"))
}

#[get("/{id}")]
pub async fn get_project_by_id(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    project_id: Deferred<web::Path<i32>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("get a project")?;
    let project_id = project_id?.into_inner();

    let project = services
        .projects
        .get_project_by_id(user.id, project_id)
        .await
        .map_err(bad_request("project doesn't exist"))?;

    Ok(HttpResponse::Ok().json(json!({ "project": project })))
}

/// Rewrites a project the caller manages. Absent `status`/`start_date` keep their values.
#[put("/{id}")]
pub async fn update_project(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    project_id: Deferred<web::Path<i32>>,
    input: Deferred<web::Json<ProjectInput>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("update a project")?;
    let project_id = project_id?.into_inner();
    let input = checked(input?)?;

    services
        .projects
        .update_project(Project::with_id(project_id, input, user.id))
        .await
        .map_err(bad_request("failed to update the project"))?;

    Ok(message("project updated successfully"))
}

/// Soft-deletes a project. Deleting an already deleted project succeeds.
#[delete("/{id}")]
pub async fn delete_project(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    project_id: Deferred<web::Path<i32>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("delete a project")?;
    let project_id = project_id?.into_inner();

    services
        .projects
        .delete_project(user.id, project_id)
        .await
        .map_err(internal("failed to delete the project"))?;

    Ok(message("project deleted successfully"))
}

#[post("/{id}/restore")]
pub async fn restore_project(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    project_id: Deferred<web::Path<i32>>,
) -> actix_web::Result<impl Responder> {
    user.require_superuser("restore a project")?;
    let project_id = project_id?.into_inner();

    services
        .projects
        .restore_project(user.id, project_id)
        .await
        .map_err(internal("failed to restore the project"))?;

    Ok(message("project restored successfully"))
}
