use crate::{
    auth::{AuthenticatedUser, SignInRequest, SignUpRequest, SignUpResponse},
    error::AppError,
    routes::{bad_request, internal, message},
    services::Services,
};
use actix_web::{http::header::AUTHORIZATION, post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates an account with the `user` role.
///
/// ## Responses:
/// - `201 Created`: `{"id": <new id>}`.
/// - `400 Bad Request`: `invalid JSON provided`, `validate` when the email or password
///   breaks the account policy, or `email is already created`.
/// - `500 Internal Server Error`: `failed to create user`.
#[post("/sign-up")]
pub async fn sign_up(
    services: web::Data<Services>,
    request: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    let request = request.into_inner();

    services
        .auth
        .validate_user(&request.credentials())
        .map_err(bad_request("validate"))?;

    let used = services
        .auth
        .is_email_used(&request.email)
        .await
        .map_err(internal("failed to create user"))?;
    if used {
        return Err(AppError::BadRequest("email is already created".into()));
    }

    let id = services
        .auth
        .create_user(request)
        .await
        .map_err(internal("failed to create user"))?;

    Ok(HttpResponse::Created().json(SignUpResponse { id }))
}

/// Sign in
///
/// On success the token is returned in the `Authorization` response header and the
/// body is `{"msg":"signed in"}`. Unknown emails and wrong passwords answer 400 with
/// the reason in `error`.
#[post("/sign-in")]
pub async fn sign_in(
    services: web::Data<Services>,
    credentials: web::Json<SignInRequest>,
) -> Result<impl Responder, AppError> {
    services
        .auth
        .validate_user(&credentials)
        .map_err(bad_request("validate"))?;

    let user = services
        .auth
        .check_user(&credentials)
        .await
        .map_err(|err| match err {
            AppError::NotFound(reason) | AppError::BadRequest(reason) => {
                AppError::BadRequest(reason)
            }
            other => internal("failed to sign in")(other),
        })?;

    let token = services.auth.generate_token(&user)?;
    log::info!("user {} signed in", user.id);

    Ok(HttpResponse::Ok()
        .insert_header((AUTHORIZATION, token))
        .json(json!({ "msg": "signed in" })))
}

/// Reactivates the caller's soft-deleted account. Sits behind the auth gate, so the
/// caller signs in first and then restores.
#[post("")]
pub async fn restore(
    services: web::Data<Services>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services
        .users
        .restore_user(user.id)
        .await
        .map_err(internal("failed to restore the user"))?;

    Ok(message("successfully restored. Now you can sign in again."))
}
