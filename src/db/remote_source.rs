// src/db/remote_source.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    common::error::AppError,
    db::data_source::DataSource,
    models::{
        dashboard::{DashboardData, GrossProfitMargin},
        filters::{DashboardFilters, DateRange, FilterSelection},
        hierarchy::{Biller, Customer, Warehouse},
        sales::TodaySaleReport,
    },
};

// Envelope padrão do backend remoto: { success, data?, error? }.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

// A variante remota do engine: em vez de SQL local, repassa as queries
// para o backend HTTP configurado (API_BASE_URL). Sem retry — qualquer
// falha de transporte ou envelope com success=false sobe como erro.
#[derive(Clone)]
pub struct RemoteDataSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteDataSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, path);
        let envelope: Envelope<T> = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !envelope.success {
            return Err(AppError::UpstreamRejected(
                envelope
                    .error
                    .unwrap_or_else(|| "resposta sem mensagem de erro".to_string()),
            ));
        }

        envelope.data.ok_or_else(|| {
            AppError::UpstreamRejected("resposta de sucesso sem campo data".to_string())
        })
    }

    fn filter_params(account_id: i64, filters: &DashboardFilters) -> Vec<(&'static str, String)> {
        let mut params = vec![("pos_accnt_id", account_id.to_string())];
        if let FilterSelection::Id(id) = filters.biller {
            params.push(("biller_id", id.to_string()));
        }
        if let FilterSelection::Id(id) = filters.warehouse {
            params.push(("warehouse_id", id.to_string()));
        }
        if let Some(range) = &filters.date_range {
            params.push(("start_date", range.start.to_string()));
            params.push(("end_date", range.end.to_string()));
        }
        params
    }
}

#[async_trait]
impl DataSource for RemoteDataSource {
    async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::error!("🔥 Falha no health check do backend remoto: {:?}", e);
                false
            }
        }
    }

    async fn get_billers(&self, account_id: i64) -> Result<Vec<Biller>, AppError> {
        self.fetch("billers", &[("pos_accnt_id", account_id.to_string())])
            .await
    }

    async fn get_warehouses(&self, account_id: i64) -> Result<Vec<Warehouse>, AppError> {
        self.fetch("warehouses", &[("pos_accnt_id", account_id.to_string())])
            .await
    }

    async fn get_customers(&self, account_id: i64) -> Result<Vec<Customer>, AppError> {
        self.fetch("customers", &[("pos_accnt_id", account_id.to_string())])
            .await
    }

    async fn get_today_sale(&self, account_id: i64) -> Result<TodaySaleReport, AppError> {
        self.fetch("today-sale", &[("pos_accnt_id", account_id.to_string())])
            .await
    }

    async fn get_dashboard_data(
        &self,
        account_id: i64,
        filters: &DashboardFilters,
    ) -> Result<DashboardData, AppError> {
        let params = Self::filter_params(account_id, filters);
        self.fetch("dashboard", &params).await
    }

    async fn get_gross_profit(
        &self,
        account_id: i64,
        range: DateRange,
    ) -> Result<GrossProfitMargin, AppError> {
        let params = vec![
            ("pos_accnt_id", account_id.to_string()),
            ("start_date", range.start.to_string()),
            ("end_date", range.end.to_string()),
        ];
        self.fetch("gross-profit-margin", &params).await
    }
}
