// src/db/sql_source.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::{
    common::error::AppError,
    db::data_source::DataSource,
    models::{
        dashboard::{DashboardData, GrossProfitMargin},
        filters::{DashboardFilters, DateRange, FilterSelection},
        hierarchy::{Biller, Customer, Warehouse},
        sales::{TodaySaleEntry, TodaySaleReport},
    },
};

// Linha intermediária dos agregados de venda.
#[derive(Debug, sqlx::FromRow)]
struct SalesAggRow {
    total_revenue: Decimal,
    sale_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct GrossProfitRow {
    revenue: Decimal,
    total_discount: Decimal,
    total_tax: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CountRow {
    total: i64,
}

// O engine real: SELECTs parametrizados contra o schema MySQL do POS.
// Todas as listas filtram por pos_accnt_id (e is_active onde a coluna
// existe) e ordenam por nome ascendente.
#[derive(Clone)]
pub struct SqlDataSource {
    pool: MySqlPool,
}

impl SqlDataSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    // Aplica os filtros opcionais de biller/warehouse/datas sobre `sales`.
    fn push_sales_filters<'a>(
        builder: &mut QueryBuilder<'a, MySql>,
        filters: &'a DashboardFilters,
    ) {
        if let FilterSelection::Id(biller_id) = filters.biller {
            builder.push(" AND s.biller_id = ").push_bind(biller_id);
        }
        if let FilterSelection::Id(warehouse_id) = filters.warehouse {
            builder.push(" AND s.warehouse_id = ").push_bind(warehouse_id);
        }
        if let Some(range) = &filters.date_range {
            builder
                .push(" AND DATE(s.created_at) BETWEEN ")
                .push_bind(range.start)
                .push(" AND ")
                .push_bind(range.end);
        }
    }
}

#[async_trait]
impl DataSource for SqlDataSource {
    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("🔥 Falha no health check do banco de dados: {:?}", e);
                false
            }
        }
    }

    async fn get_billers(&self, account_id: i64) -> Result<Vec<Biller>, AppError> {
        let billers = sqlx::query_as::<_, Biller>(
            r#"
            SELECT id, name, company_name, email, phone_number, address,
                   is_active, pos_accnt_id
            FROM billers
            WHERE pos_accnt_id = ? AND is_active = 1
            ORDER BY name ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(billers)
    }

    async fn get_warehouses(&self, account_id: i64) -> Result<Vec<Warehouse>, AppError> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, name, phone, email, address, is_active,
                   pos_accnt_id, biller_id
            FROM warehouses
            WHERE pos_accnt_id = ? AND is_active = 1
            ORDER BY name ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(warehouses)
    }

    async fn get_customers(&self, account_id: i64) -> Result<Vec<Customer>, AppError> {
        // `customers` não tem flag is_active no schema do POS.
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, customer_group_id, phone_number, email,
                   city, country, origin, member_no, village, sub_county,
                   assigned, pos_accnt_id
            FROM customers
            WHERE pos_accnt_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn get_today_sale(&self, account_id: i64) -> Result<TodaySaleReport, AppError> {
        // LEFT JOIN garante que warehouse sem venda hoje aparece zerado.
        let warehouses = sqlx::query_as::<_, TodaySaleEntry>(
            r#"
            SELECT w.id AS warehouse_id,
                   w.name AS warehouse_name,
                   COALESCE(SUM(s.grand_total), 0) AS total_sales,
                   COUNT(s.id) AS sale_count,
                   COALESCE(AVG(s.grand_total), 0) AS average_sale
            FROM warehouses w
            LEFT JOIN sales s
                   ON s.warehouse_id = w.id
                  AND s.pos_accnt_id = w.pos_accnt_id
                  AND DATE(s.created_at) = CURDATE()
            WHERE w.pos_accnt_id = ? AND w.is_active = 1
            GROUP BY w.id, w.name
            ORDER BY w.name ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        let total_sale_amount = warehouses.iter().map(|w| w.total_sales).sum();

        Ok(TodaySaleReport {
            warehouses,
            total_sale_amount,
        })
    }

    async fn get_dashboard_data(
        &self,
        account_id: i64,
        filters: &DashboardFilters,
    ) -> Result<DashboardData, AppError> {
        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT COALESCE(SUM(s.grand_total), 0) AS total_revenue, \
             COUNT(s.id) AS sale_count \
             FROM sales s WHERE s.pos_accnt_id = ",
        );
        builder.push_bind(account_id);
        Self::push_sales_filters(&mut builder, filters);

        let agg: SalesAggRow = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await?;

        let customers: CountRow = sqlx::query_as(
            "SELECT COUNT(id) AS total FROM customers WHERE pos_accnt_id = ?",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        let average_sale = if agg.sale_count > 0 {
            agg.total_revenue / Decimal::from(agg.sale_count)
        } else {
            Decimal::ZERO
        };

        Ok(DashboardData {
            total_revenue: agg.total_revenue,
            sale_count: agg.sale_count,
            customer_count: customers.total,
            average_sale,
        })
    }

    async fn get_gross_profit(
        &self,
        account_id: i64,
        range: DateRange,
    ) -> Result<GrossProfitMargin, AppError> {
        let row: GrossProfitRow = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(grand_total), 0)    AS revenue,
                   COALESCE(SUM(total_discount), 0) AS total_discount,
                   COALESCE(SUM(total_tax), 0)      AS total_tax
            FROM sales
            WHERE pos_accnt_id = ?
              AND DATE(created_at) BETWEEN ? AND ?
            "#,
        )
        .bind(account_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(GrossProfitMargin {
            margin_percent: margin_percent(row.revenue, row.total_discount, row.total_tax),
            revenue: row.revenue,
            total_discount: row.total_discount,
            total_tax: row.total_tax,
        })
    }
}

// Margem aproximada: (receita - desconto - imposto) / receita, em %.
// O schema não tem custo de mercadoria.
pub(crate) fn margin_percent(revenue: Decimal, discount: Decimal, tax: Decimal) -> Decimal {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    (revenue - discount - tax) / revenue * Decimal::ONE_HUNDRED
}
