// src/db/mock_source.rs

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{data_source::DataSource, sql_source::margin_percent},
    models::{
        dashboard::{DashboardData, GrossProfitMargin},
        filters::{DashboardFilters, DateRange, FilterSelection},
        hierarchy::{Biller, Customer, Warehouse},
        sales::{Sale, TodaySaleReport},
    },
    services::analytics,
};

// Contadores de chamadas, para os testes de cache observarem se uma busca
// realmente chegou na fonte ou foi servida da memória.
#[derive(Debug, Default)]
pub struct CallCounters {
    pub billers: AtomicUsize,
    pub warehouses: AtomicUsize,
    pub customers: AtomicUsize,
    pub today_sale: AtomicUsize,
    pub dashboard: AtomicUsize,
    pub gross_profit: AtomicUsize,
}

// A variante mock do engine: mesma interface, dados em memória.
// Compartilha os helpers de agregação com o resto do crate para que a
// semântica (zero-fill, ordenação) seja a mesma do engine real.
pub struct MockDataSource {
    billers: Vec<Biller>,
    warehouses: Vec<Warehouse>,
    customers: Vec<Customer>,
    sales: Vec<Sale>,
    pub calls: CallCounters,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::with_data(
            fixture_billers(),
            fixture_warehouses(),
            fixture_customers(),
            fixture_sales(),
        )
    }

    pub fn with_data(
        billers: Vec<Biller>,
        warehouses: Vec<Warehouse>,
        customers: Vec<Customer>,
        sales: Vec<Sale>,
    ) -> Self {
        Self {
            billers,
            warehouses,
            customers,
            sales,
            calls: CallCounters::default(),
        }
    }

    fn scoped_sales(&self, account_id: i64, filters: &DashboardFilters) -> Vec<&Sale> {
        self.sales
            .iter()
            .filter(|s| s.pos_accnt_id == account_id)
            .filter(|s| match filters.biller {
                FilterSelection::All => true,
                FilterSelection::Id(id) => s.biller_id == Some(id),
            })
            .filter(|s| match filters.warehouse {
                FilterSelection::All => true,
                FilterSelection::Id(id) => s.warehouse_id == Some(id),
            })
            .collect()
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn health_check(&self) -> bool {
        true
    }

    async fn get_billers(&self, account_id: i64) -> Result<Vec<Biller>, AppError> {
        self.calls.billers.fetch_add(1, Ordering::SeqCst);
        let mut billers: Vec<Biller> = self
            .billers
            .iter()
            .filter(|b| b.pos_accnt_id == account_id && b.is_active)
            .cloned()
            .collect();
        billers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(billers)
    }

    async fn get_warehouses(&self, account_id: i64) -> Result<Vec<Warehouse>, AppError> {
        self.calls.warehouses.fetch_add(1, Ordering::SeqCst);
        let mut warehouses: Vec<Warehouse> = self
            .warehouses
            .iter()
            .filter(|w| w.pos_accnt_id == account_id && w.is_active)
            .cloned()
            .collect();
        warehouses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(warehouses)
    }

    async fn get_customers(&self, account_id: i64) -> Result<Vec<Customer>, AppError> {
        self.calls.customers.fetch_add(1, Ordering::SeqCst);
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .filter(|c| c.pos_accnt_id == account_id)
            .cloned()
            .collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn get_today_sale(&self, account_id: i64) -> Result<TodaySaleReport, AppError> {
        self.calls.today_sale.fetch_add(1, Ordering::SeqCst);
        let mut warehouses: Vec<Warehouse> = self
            .warehouses
            .iter()
            .filter(|w| w.pos_accnt_id == account_id && w.is_active)
            .cloned()
            .collect();
        warehouses.sort_by(|a, b| a.name.cmp(&b.name));
        // No mock todas as vendas da fixture contam como "hoje".
        let sales: Vec<Sale> = self
            .sales
            .iter()
            .filter(|s| s.pos_accnt_id == account_id)
            .cloned()
            .collect();
        Ok(analytics::aggregate_today_sales(&warehouses, &sales))
    }

    async fn get_dashboard_data(
        &self,
        account_id: i64,
        filters: &DashboardFilters,
    ) -> Result<DashboardData, AppError> {
        self.calls.dashboard.fetch_add(1, Ordering::SeqCst);
        let sales = self.scoped_sales(account_id, filters);

        let total_revenue: Decimal = sales.iter().map(|s| s.grand_total).sum();
        let sale_count = sales.len() as i64;
        let customer_count = self
            .customers
            .iter()
            .filter(|c| c.pos_accnt_id == account_id)
            .count() as i64;
        let average_sale = if sale_count > 0 {
            total_revenue / Decimal::from(sale_count)
        } else {
            Decimal::ZERO
        };

        Ok(DashboardData {
            total_revenue,
            sale_count,
            customer_count,
            average_sale,
        })
    }

    async fn get_gross_profit(
        &self,
        account_id: i64,
        _range: DateRange,
    ) -> Result<GrossProfitMargin, AppError> {
        self.calls.gross_profit.fetch_add(1, Ordering::SeqCst);
        let sales: Vec<&Sale> = self
            .sales
            .iter()
            .filter(|s| s.pos_accnt_id == account_id)
            .collect();

        let revenue: Decimal = sales.iter().map(|s| s.grand_total).sum();
        let total_discount: Decimal = sales.iter().map(|s| s.total_discount).sum();
        let total_tax: Decimal = sales.iter().map(|s| s.total_tax).sum();

        Ok(GrossProfitMargin {
            margin_percent: margin_percent(revenue, total_discount, total_tax),
            revenue,
            total_discount,
            total_tax,
        })
    }
}

// --- FIXTURES (account 1) ---

fn fixture_billers() -> Vec<Biller> {
    vec![
        Biller {
            id: 1,
            name: "Kampala Billing".to_string(),
            is_active: true,
            pos_accnt_id: 1,
            ..Default::default()
        },
        Biller {
            id: 2,
            name: "Entebbe Billing".to_string(),
            is_active: true,
            pos_accnt_id: 1,
            ..Default::default()
        },
    ]
}

fn fixture_warehouses() -> Vec<Warehouse> {
    vec![
        Warehouse {
            id: 1,
            name: "Central".to_string(),
            is_active: true,
            pos_accnt_id: 1,
            biller_id: Some(1),
            ..Default::default()
        },
        Warehouse {
            id: 2,
            name: "Norte".to_string(),
            is_active: true,
            pos_accnt_id: 1,
            biller_id: Some(1),
            ..Default::default()
        },
        Warehouse {
            id: 3,
            name: "Aeroporto".to_string(),
            is_active: true,
            pos_accnt_id: 1,
            biller_id: Some(2),
            ..Default::default()
        },
    ]
}

fn fixture_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: 1,
            name: "Amina".to_string(),
            origin: Some("student exchange".to_string()),
            assigned: Some(1),
            pos_accnt_id: 1,
            ..Default::default()
        },
        Customer {
            id: 2,
            name: "Brian".to_string(),
            village: Some("Bugema".to_string()),
            assigned: Some(2),
            pos_accnt_id: 1,
            ..Default::default()
        },
        Customer {
            id: 3,
            name: "Clara".to_string(),
            pos_accnt_id: 1,
            ..Default::default()
        },
        Customer {
            id: 4,
            name: "David".to_string(),
            sub_county: Some("Kyadondo".to_string()),
            pos_accnt_id: 1,
            ..Default::default()
        },
    ]
}

fn fixture_sales() -> Vec<Sale> {
    vec![
        Sale {
            id: 1,
            customer_id: Some(1),
            warehouse_id: Some(1),
            biller_id: Some(1),
            grand_total: Decimal::from(100),
            pos_accnt_id: 1,
            ..Default::default()
        },
        Sale {
            id: 2,
            customer_id: Some(2),
            warehouse_id: Some(2),
            biller_id: Some(1),
            grand_total: Decimal::from(250),
            total_discount: Decimal::from(10),
            pos_accnt_id: 1,
            ..Default::default()
        },
        Sale {
            id: 3,
            customer_id: Some(3),
            warehouse_id: Some(3),
            biller_id: Some(2),
            grand_total: Decimal::from(75),
            total_tax: Decimal::from(5),
            pos_accnt_id: 1,
            ..Default::default()
        },
    ]
}
