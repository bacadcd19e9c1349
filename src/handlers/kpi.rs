// src/handlers/kpi.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::account::AccountContext,
    models::filters::{DashboardFilters, DateRange, FilterSelection},
};

// Janela de datas do dashboard, derivada do parâmetro `period`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    pub fn to_date_range(self, today: NaiveDate) -> DateRange {
        let start = match self {
            Period::Today => today,
            Period::Week => today - Duration::days(6),
            Period::Month => today - Duration::days(29),
        };
        DateRange { start, end: today }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    // today (default) | week | month
    pub period: Option<Period>,

    #[validate(range(min = 1, message = "billerId deve ser positivo"))]
    pub biller_id: Option<i64>,

    #[validate(range(min = 1, message = "warehouseId deve ser positivo"))]
    pub warehouse_id: Option<i64>,
}

// GET /api/kpi/dashboard
#[utoipa::path(
    get,
    path = "/api/kpi/dashboard",
    tag = "KPI",
    params(
        DashboardQuery,
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Bundle do dashboard para os filtros ativos"),
        (status = 400, description = "Filtros inválidos"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    account: AccountContext,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let period = query.period.unwrap_or(Period::Today);
    let filters = DashboardFilters {
        biller: FilterSelection::from_optional_id(query.biller_id),
        warehouse: FilterSelection::from_optional_id(query.warehouse_id),
        date_range: Some(period.to_date_range(Utc::now().date_naive())),
    };

    let bundle = app_state
        .initializer
        .initialize_dashboard_data(account.0, filters)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(bundle))))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "snake_case")]
pub struct GrossProfitQuery {
    pub start_date: String,
    pub end_date: String,
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidDateParam(format!("{field} deve estar no formato YYYY-MM-DD"))
    })
}

// GET /api/kpi/gross-profit-margin
#[utoipa::path(
    get,
    path = "/api/kpi/gross-profit-margin",
    tag = "KPI",
    params(
        GrossProfitQuery,
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Margem bruta aproximada sobre o intervalo"),
        (status = 400, description = "Datas inválidas"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_gross_profit_margin(
    State(app_state): State<AppState>,
    account: AccountContext,
    Query(query): Query<GrossProfitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_date(&query.start_date, "start_date")?;
    let end = parse_date(&query.end_date, "end_date")?;
    if start > end {
        return Err(AppError::InvalidDateParam(
            "start_date deve ser anterior ou igual a end_date".to_string(),
        ));
    }

    let margin = app_state
        .dashboard_service
        .get_gross_profit(account.0, DateRange { start, end })
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(margin))))
}

// GET /api/kpi/today-sale
#[utoipa::path(
    get,
    path = "/api/kpi/today-sale",
    tag = "KPI",
    params(
        ("x-pos-account-id" = i64, Header, description = "Account id (pos_accnt_id)")
    ),
    responses(
        (status = 200, description = "Agregado de vendas do dia por warehouse"),
        (status = 500, description = "Falha de query")
    )
)]
pub async fn get_today_sale(
    State(app_state): State<AppState>,
    account: AccountContext,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.dashboard_service.get_today_sale(account.0).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(report))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_today_e_um_unico_dia() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let range = Period::Today.to_date_range(today);
        assert_eq!(range.start, today);
        assert_eq!(range.end, today);
    }

    #[test]
    fn period_week_cobre_sete_dias() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let range = Period::Week.to_date_range(today);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 8, 21).unwrap());
        assert_eq!(range.end, today);
    }

    #[test]
    fn data_mal_formada_e_rejeitada() {
        assert!(parse_date("2026-08-27", "start_date").is_ok());
        assert!(parse_date("27/08/2026", "start_date").is_err());
        assert!(parse_date("hoje", "end_date").is_err());
    }
}
