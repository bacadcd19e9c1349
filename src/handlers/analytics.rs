// src/handlers/analytics.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::account::AccountContext,
    services::analytics,
};

// As views de analytics são derivadas, não persistidas: recomputadas a
// cada request a partir do resultado mais recente das queries.

// GET /api/analytics/segmentation
#[utoipa::path(
    get,
    path = "/api/analytics/segmentation",
    tag = "Analytics",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Segmentação Students/Villagers/Households"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_segmentation(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.dashboard_service.get_customers(account.0).await?;
    let segmentation = analytics::segment_customers(&customers);
    Ok((StatusCode::OK, Json(ApiResponse::ok(segmentation))))
}

// GET /api/analytics/activation
#[utoipa::path(
    get,
    path = "/api/analytics/activation",
    tag = "Analytics",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Smart activation metrics vs. meta"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_activation(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.dashboard_service.get_customers(account.0).await?;
    let metrics = analytics::activation_metrics(&customers);
    Ok((StatusCode::OK, Json(ApiResponse::ok(metrics))))
}

// GET /api/analytics/revenue-breakdown
#[utoipa::path(
    get,
    path = "/api/analytics/revenue-breakdown",
    tag = "Analytics",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Receita por warehouse"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_revenue_breakdown(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.dashboard_service.get_today_sale(account.0).await?;
    let breakdown = analytics::revenue_breakdown(&report);
    Ok((StatusCode::OK, Json(ApiResponse::ok(breakdown))))
}
