// src/handlers/health.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{common::response::ApiResponse, config::AppState};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub database: bool,
}

// GET /api/health
// Falha de conexão não vira erro HTTP: o check responde 200 com
// database=false, como a fonte original.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Status do serviço e da fonte de dados")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    let database = app_state.dashboard_service.health_check().await;
    (
        StatusCode::OK,
        Json(ApiResponse::ok(HealthStatus { database })),
    )
}
