// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub biller_id: Option<i64>,
    pub total_qty: Decimal,
    pub total_discount: Decimal,
    pub total_tax: Decimal,
    pub grand_total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub pos_accnt_id: i64,
}

// Agregado de vendas do dia, por warehouse.
// Warehouses sem venda aparecem zerados (nunca null/ausente).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySaleEntry {
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub total_sales: Decimal,
    pub sale_count: i64,
    pub average_sale: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySaleReport {
    pub warehouses: Vec<TodaySaleEntry>,
    pub total_sale_amount: Decimal,
}
