// src/services/dashboard.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::DataSource,
    models::{
        dashboard::{DashboardData, GrossProfitMargin},
        filters::{DashboardFilters, DateRange},
        hierarchy::{Biller, Customer, Warehouse},
        sales::TodaySaleReport,
    },
};

// Façade fina sobre o data source: valida nada além do que os handlers
// já validaram e devolve DTOs estáveis.
#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn DataSource>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub async fn health_check(&self) -> bool {
        self.source.health_check().await
    }

    pub async fn get_billers(&self, account_id: i64) -> Result<Vec<Biller>, AppError> {
        self.source.get_billers(account_id).await
    }

    pub async fn get_warehouses(&self, account_id: i64) -> Result<Vec<Warehouse>, AppError> {
        self.source.get_warehouses(account_id).await
    }

    pub async fn get_customers(&self, account_id: i64) -> Result<Vec<Customer>, AppError> {
        self.source.get_customers(account_id).await
    }

    pub async fn get_today_sale(&self, account_id: i64) -> Result<TodaySaleReport, AppError> {
        self.source.get_today_sale(account_id).await
    }

    pub async fn get_dashboard_data(
        &self,
        account_id: i64,
        filters: &DashboardFilters,
    ) -> Result<DashboardData, AppError> {
        self.source.get_dashboard_data(account_id, filters).await
    }

    pub async fn get_gross_profit(
        &self,
        account_id: i64,
        range: DateRange,
    ) -> Result<GrossProfitMargin, AppError> {
        self.source.get_gross_profit(account_id, range).await
    }
}
