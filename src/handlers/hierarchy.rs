// src/handlers/hierarchy.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::account::AccountContext,
};

// GET /api/hierarchy/billers
#[utoipa::path(
    get,
    path = "/api/hierarchy/billers",
    tag = "Hierarquia",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Billers ativos do account, por nome"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_billers(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let billers = app_state.dashboard_service.get_billers(account.0).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(billers))))
}

// GET /api/hierarchy/warehouses
#[utoipa::path(
    get,
    path = "/api/hierarchy/warehouses",
    tag = "Hierarquia",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Warehouses ativos do account, por nome"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_warehouses(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let warehouses = app_state.dashboard_service.get_warehouses(account.0).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(warehouses))))
}

// GET /api/hierarchy/customers
#[utoipa::path(
    get,
    path = "/api/hierarchy/customers",
    tag = "Hierarquia",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Clientes do account, por nome"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_customers(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.dashboard_service.get_customers(account.0).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(customers))))
}
