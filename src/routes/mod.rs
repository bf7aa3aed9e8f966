pub mod auth;
pub mod health;
pub mod project;
pub mod task;
pub mod user;

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use crate::auth::AuthMiddleware;
use crate::error::{AppError, AppResult};
use crate::services::Services;

/// Largest accepted profile photo, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct PhotoLimit(pub usize);

/// Registers every route. `/ping` is public, everything else lives under `/v1`.
pub fn config(cfg: &mut web::ServiceConfig, services: Services, max_photo_bytes: usize) {
    let gate = AuthMiddleware::new(services.auth.clone());

    cfg.app_data(web::Data::new(services))
        .app_data(web::Data::new(PhotoLimit(max_photo_bytes)))
        .app_data(json_config())
        .app_data(path_config())
        .service(health::ping)
        .service(
            web::scope("/v1")
                .service(
                    web::scope("/auth")
                        .service(auth::sign_up)
                        .service(auth::sign_in),
                )
                .service(
                    web::scope("/restore")
                        .wrap(gate.clone())
                        .service(auth::restore),
                )
                .service(
                    web::scope("/user")
                        .wrap(gate.clone())
                        .service(user::get_user)
                        .service(user::update_user)
                        .service(user::delete_user)
                        .service(user::get_projects)
                        .service(user::get_tasks)
                        .service(user::set_profile_photo)
                        .service(user::change_profile_photo),
                )
                .service(
                    // `/deleted` and `/users` must be registered ahead of `/{id}`.
                    web::scope("/project")
                        .wrap(gate.clone())
                        .service(project::create_project)
                        .service(project::get_all_projects)
                        .service(project::get_deleted_projects)
                        .service(project::add_user_to_project)
                        .service(project::get_project_by_id)
                        .service(project::update_project)
                        .service(project::delete_project)
                        .service(project::restore_project),
                )
                .service(
                    web::scope("/task")
                        .wrap(gate)
                        .service(task::create_task)
                        .service(task::get_all_tasks)
                        .service(task::get_task_by_id)
                        .service(task::update_task)
                        .service(task::delete_task)
                        .service(task::restore_task),
                ),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected JSON body: {}", err);
        AppError::BadRequest("invalid JSON provided".into()).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("rejected path parameter: {}", err);
        AppError::BadRequest("invalid type of param".into()).into()
    })
}

/// An extractor outcome held back so the role check can answer first.
pub(crate) type Deferred<T> = Result<T, actix_web::Error>;

/// Unwraps a JSON body and applies its field rules. Rule violations read the same as
/// a body that failed to parse.
pub(crate) fn checked<T: Validate>(input: web::Json<T>) -> AppResult<T> {
    let input = input.into_inner();
    input.validate().map_err(|err| {
        log::debug!("rejected JSON body: {}", err);
        AppError::BadRequest("invalid JSON provided".into())
    })?;
    Ok(input)
}

/// Logs the underlying failure and replaces it with a fixed 500 message.
pub(crate) fn internal(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        log::error!("{}: {}", message, err);
        AppError::InternalServerError(message.into())
    }
}

/// Logs the underlying failure and replaces it with a fixed 400 message.
pub(crate) fn bad_request(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        log::warn!("{}: {}", message, err);
        AppError::BadRequest(message.into())
    }
}

/// `{"<key>": items}`, or `{"message": empty_message}` when there is nothing to list.
pub(crate) fn listing<T: Serialize>(key: &str, items: Vec<T>, empty_message: &str) -> HttpResponse {
    if items.is_empty() {
        return HttpResponse::Ok().json(json!({ "message": empty_message }));
    }
    HttpResponse::Ok().json(HashMap::from([(key, items)]))
}

pub(crate) fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": text }))
}
