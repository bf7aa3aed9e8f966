use crate::{
    auth::{AuthenticatedUser, SignUpRequest},
    error::AppError,
    routes::{bad_request, internal, listing, message, PhotoLimit},
    services::Services,
    upload::read_photo,
};
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Returns the caller's own account as `{"user": {...}}`.
#[get("/")]
pub async fn get_user(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let account = services
        .users
        .get_user(user.id)
        .await
        .map_err(internal("failed to get the user"))?;

    Ok(HttpResponse::Ok().json(json!({ "user": account })))
}

/// Rewrites the caller's names, email and password.
///
/// The body has the same shape as sign-up and goes through the same account policy.
/// Role and active flag are never touched here.
///
/// ## Responses:
/// - `200 OK`: `user successfully updated`.
/// - `400 Bad Request`: `invalid JSON provided` or `validate`.
/// - `500 Internal Server Error`: `failed to update the user`.
#[put("/")]
pub async fn update_user(
    services: web::Data<Services>,
    user: AuthenticatedUser,
    request: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    services
        .users
        .update_user(user.id, request.into_inner())
        .await
        .map_err(|err| match err {
            AppError::Forbidden(_) => bad_request("validate")(err),
            other => internal("failed to update the user")(other),
        })?;

    Ok(message("user successfully updated"))
}

/// Soft-deletes the caller's account. The token stays valid until it expires, which
/// is what lets `/v1/restore` work.
#[delete("/")]
pub async fn delete_user(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services
        .users
        .delete_user(user.id)
        .await
        .map_err(internal("failed to delete the user"))?;

    Ok(message("user successfully deleted"))
}

#[get("/projects")]
pub async fn get_projects(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let projects = services
        .users
        .get_projects(user.id)
        .await
        .map_err(internal("failed to get the list of projects"))?;

    Ok(listing("projects", projects, "you don't have any project"))
}

/// Tasks where the caller is the executor.
#[get("/tasks")]
pub async fn get_tasks(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = services
        .users
        .get_tasks(user.id)
        .await
        .map_err(bad_request("failed to get the list of tasks"))?;

    Ok(listing("tasks", tasks, "there is no any tasks"))
}

/// Uploads the first profile photo from the multipart field `photo`.
///
/// ## Responses:
/// - `200 OK`: `{"message": ..., "data": <user>}`.
/// - `400 Bad Request`: missing field, unreadable body, or a file over the size limit.
/// - `415 Unsupported Media Type`: the file is not `.jpg`, `.jpeg` or `.png`.
/// - `500 Internal Server Error`: the file could not be written.
#[post("/photo")]
pub async fn set_profile_photo(
    services: web::Data<Services>,
    limit: web::Data<PhotoLimit>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let photo = read_photo(payload, limit.0).await?;
    let account = services.users.upload_photo(user.id, photo).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "profile photo uploaded successfully",
        "data": account,
    })))
}

/// Replaces the profile photo and removes the previous file.
#[put("/photo")]
pub async fn change_profile_photo(
    services: web::Data<Services>,
    limit: web::Data<PhotoLimit>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let photo = read_photo(payload, limit.0).await?;
    let account = services.users.change_photo(user.id, photo).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "success",
        "data": account,
    })))
}
