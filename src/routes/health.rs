use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Liveness check, outside the versioned API and without authentication.
#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "pong" }))
}
