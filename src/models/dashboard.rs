// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::analytics::{CustomerSegmentation, RevenueBreakdown, SmartActivationMetrics};
use crate::models::sales::TodaySaleReport;

// 1. Agregado principal do dashboard (os cards do topo)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_revenue: Decimal,
    pub sale_count: i64,
    pub customer_count: i64,
    pub average_sale: Decimal,
}

// 2. Bundle memoizado pelo initializer, chaveado pelos filtros ativos.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBundle {
    pub dashboard: DashboardData,
    pub activation: SmartActivationMetrics,
    pub segmentation: CustomerSegmentation,
    pub revenue_breakdown: RevenueBreakdown,
    pub today_sale: TodaySaleReport,
}

// 3. KPI de margem bruta sobre um intervalo de datas.
// O schema não tem custo de mercadoria; a margem aqui é
// (receita - desconto - imposto) / receita, uma aproximação assumida.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrossProfitMargin {
    pub revenue: Decimal,
    pub total_discount: Decimal,
    pub total_tax: Decimal,
    pub margin_percent: Decimal,
}
