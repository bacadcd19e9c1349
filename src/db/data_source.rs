// src/db/data_source.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{DashboardData, GrossProfitMargin},
        filters::{DashboardFilters, DateRange},
        hierarchy::{Biller, Customer, Warehouse},
        sales::TodaySaleReport,
    },
};

// A interface única do query engine. As variantes real/mock/legacy da fonte
// original viram implementações desta trait, escolhidas por configuração
// (env DATA_SOURCE) em vez de por call sites separados.
//
// Toda operação é escopada pelo account id (pos_accnt_id) — não existe
// acesso cross-tenant. Falha de query propaga como AppError; lista vazia
// nunca é erro.
#[async_trait]
pub trait DataSource: Send + Sync {
    // Ping na fonte. Falha de conexão é logada e vira `false`, nunca erro.
    async fn health_check(&self) -> bool;

    async fn get_billers(&self, account_id: i64) -> Result<Vec<Biller>, AppError>;

    async fn get_warehouses(&self, account_id: i64) -> Result<Vec<Warehouse>, AppError>;

    async fn get_customers(&self, account_id: i64) -> Result<Vec<Customer>, AppError>;

    // Agregado de vendas do dia corrente, por warehouse, com zero-fill
    // para warehouses sem venda.
    async fn get_today_sale(&self, account_id: i64) -> Result<TodaySaleReport, AppError>;

    async fn get_dashboard_data(
        &self,
        account_id: i64,
        filters: &DashboardFilters,
    ) -> Result<DashboardData, AppError>;

    // KPI de margem bruta sobre um intervalo de datas fechado.
    async fn get_gross_profit(
        &self,
        account_id: i64,
        range: DateRange,
    ) -> Result<GrossProfitMargin, AppError>;
}
