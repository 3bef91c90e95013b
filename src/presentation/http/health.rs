use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
    pub message: &'static str,
}

/// Liveness only; never touches the database.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    security(()),
    responses((status = 200, body = HealthResp))
)]
pub async fn health() -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok",
        message: "Server is running",
    })
}

pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}
