// Comportamento do DashboardContext: máquina de estados por domínio,
// consistência pai-filho dos filtros e descarte de respostas superadas.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use rust_decimal::Decimal;

use bi_backend::cache::{DataInitializer, SystemClock};
use bi_backend::common::error::AppError;
use bi_backend::db::{DataSource, MockDataSource};
use bi_backend::models::dashboard::{DashboardData, GrossProfitMargin};
use bi_backend::models::filters::{DashboardFilters, DateRange, FilterSelection};
use bi_backend::models::hierarchy::{Biller, Customer, Warehouse};
use bi_backend::models::sales::TodaySaleReport;
use bi_backend::state::{DashboardContext, DomainState};

const ACCOUNT: i64 = 1;

fn context_with(mock: &Arc<MockDataSource>) -> DashboardContext {
    let source: Arc<dyn DataSource> = mock.clone();
    let initializer = Arc::new(DataInitializer::new(source, Arc::new(SystemClock)));
    DashboardContext::new(initializer, ACCOUNT)
}

#[tokio::test]
async fn mount_carrega_hierarquia_e_dashboard() {
    let mock = Arc::new(MockDataSource::new());
    let context = context_with(&mock);

    assert_eq!(context.hierarchy_state(), DomainState::Idle);
    assert_eq!(context.dashboard_state(), DomainState::Idle);

    context.mount().await;

    assert_eq!(context.hierarchy_state(), DomainState::Ready);
    assert_eq!(context.dashboard_state(), DomainState::Ready);
    assert_eq!(context.analytics_state(), DomainState::Ready);

    let hierarchy = context.hierarchy().unwrap();
    assert_eq!(hierarchy.billers.len(), 2);
    assert_eq!(hierarchy.warehouses.len(), 3);

    // Índices derivados: warehouses por biller, clientes por warehouse.
    assert_eq!(hierarchy.warehouses_by_biller[&1].len(), 2);
    assert_eq!(hierarchy.warehouses_by_biller[&2].len(), 1);
    assert_eq!(hierarchy.customers_by_warehouse[&1].len(), 1);
    assert_eq!(hierarchy.customers_by_warehouse[&2].len(), 1);

    let bundle = context.bundle().unwrap();
    assert_eq!(bundle.dashboard.total_revenue, Decimal::from(425));
}

#[tokio::test]
async fn trocar_biller_reseta_warehouse_no_mesmo_update() {
    let mock = Arc::new(MockDataSource::new());
    let context = context_with(&mock);
    context.mount().await;

    context.set_warehouse(FilterSelection::Id(2)).await;
    assert_eq!(
        context.selected_filters().warehouse,
        FilterSelection::Id(2)
    );

    context.set_biller(FilterSelection::Id(1)).await;
    let filters = context.selected_filters();
    assert_eq!(filters.biller, FilterSelection::Id(1));
    assert_eq!(filters.warehouse, FilterSelection::All);
}

#[tokio::test]
async fn mudanca_de_filtro_dispara_novo_fetch() {
    let mock = Arc::new(MockDataSource::new());
    let context = context_with(&mock);
    context.mount().await;

    let antes = mock.calls.dashboard.load(Ordering::SeqCst);
    context.set_warehouse(FilterSelection::Id(1)).await;
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), antes + 1);

    let bundle = context.bundle().unwrap();
    assert_eq!(bundle.dashboard.total_revenue, Decimal::from(100));
}

#[tokio::test]
async fn resposta_superada_e_descartada() {
    let mock = Arc::new(MockDataSource::new());
    let context = context_with(&mock);
    context.mount().await;

    let source: Arc<dyn DataSource> = mock.clone();
    let initializer = DataInitializer::new(source, Arc::new(SystemClock));

    // Dois fetches em voo: o primeiro ticket é superado pelo segundo.
    let ticket_velho = context.begin_dashboard_fetch();
    let ticket_novo = context.begin_dashboard_fetch();

    let bundle_velho = initializer
        .initialize_dashboard_data(
            ACCOUNT,
            DashboardFilters {
                warehouse: FilterSelection::Id(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let bundle_novo = initializer
        .initialize_dashboard_data(ACCOUNT, DashboardFilters::default())
        .await
        .unwrap();

    // A resposta velha resolve por último mas não sobrescreve nada.
    context.apply_dashboard_result(ticket_novo, Ok(bundle_novo));
    assert_eq!(context.dashboard_state(), DomainState::Ready);
    let aplicado = context.bundle().unwrap().dashboard.total_revenue;

    context.apply_dashboard_result(ticket_velho, Ok(bundle_velho));
    assert_eq!(
        context.bundle().unwrap().dashboard.total_revenue,
        aplicado
    );
    assert_eq!(context.dashboard_state(), DomainState::Ready);
}

#[tokio::test]
async fn refresh_limpa_o_cache_e_refaz_os_fetches() {
    let mock = Arc::new(MockDataSource::new());
    let context = context_with(&mock);
    context.mount().await;

    let antes = mock.calls.dashboard.load(Ordering::SeqCst);
    // Sem refresh, os mesmos filtros seriam servidos do cache; o
    // refresh limpa e volta na fonte.
    context.refresh_data().await;
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), antes + 1);
    assert_eq!(context.dashboard_state(), DomainState::Ready);
    assert_eq!(context.hierarchy_state(), DomainState::Ready);
}

// Fonte que falha sempre, para exercitar o caminho de erro.
struct FailingSource;

#[async_trait]
impl DataSource for FailingSource {
    async fn health_check(&self) -> bool {
        false
    }

    async fn get_billers(&self, _: i64) -> Result<Vec<Biller>, AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")))
    }

    async fn get_warehouses(&self, _: i64) -> Result<Vec<Warehouse>, AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")))
    }

    async fn get_customers(&self, _: i64) -> Result<Vec<Customer>, AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")))
    }

    async fn get_today_sale(&self, _: i64) -> Result<TodaySaleReport, AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")))
    }

    async fn get_dashboard_data(
        &self,
        _: i64,
        _: &DashboardFilters,
    ) -> Result<DashboardData, AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")))
    }

    async fn get_gross_profit(
        &self,
        _: i64,
        _: DateRange,
    ) -> Result<GrossProfitMargin, AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")))
    }
}

#[tokio::test]
async fn falha_no_fan_out_descarta_o_dominio_inteiro() {
    let initializer = Arc::new(DataInitializer::new(
        Arc::new(FailingSource),
        Arc::new(SystemClock),
    ));
    let context = DashboardContext::new(initializer, ACCOUNT);

    context.mount().await;

    assert!(matches!(context.hierarchy_state(), DomainState::Error(_)));
    assert!(matches!(context.dashboard_state(), DomainState::Error(_)));
    assert!(matches!(context.analytics_state(), DomainState::Error(_)));
    assert!(context.hierarchy().is_none());
    assert!(context.bundle().is_none());
}
