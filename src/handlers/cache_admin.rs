// src/handlers/cache_admin.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{common::error::AppError, config::AppState};

// POST /api/cache/clear
// Derruba todas as entradas memoizadas; o próximo fetch de qualquer
// combinação de filtros volta a consultar a fonte.
#[utoipa::path(
    post,
    path = "/api/cache/clear",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache limpo")
    )
)]
pub async fn clear_cache(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.initializer.clear_cache();
    tracing::info!("Cache de dashboard limpo via API");
    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "data": { "cleared": true } })),
    ))
}
