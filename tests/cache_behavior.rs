// Comportamento do cache do DataInitializer: memoização por chave
// estruturada de filtros, clear/refresh explícitos, TTL e limite de
// entradas. Tudo observado pelos contadores de chamadas do mock.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use bi_backend::cache::{DataInitializer, ManualClock, SystemClock};
use bi_backend::db::{DataSource, MockDataSource};
use bi_backend::models::filters::{DashboardFilters, FilterSelection};

const ACCOUNT: i64 = 1;

fn filters_all() -> DashboardFilters {
    DashboardFilters::default()
}

fn filters_biller(id: i64) -> DashboardFilters {
    DashboardFilters {
        biller: FilterSelection::Id(id),
        ..Default::default()
    }
}

fn initializer_with(mock: &Arc<MockDataSource>) -> Arc<DataInitializer> {
    let source: Arc<dyn DataSource> = mock.clone();
    Arc::new(DataInitializer::new(source, Arc::new(SystemClock)))
}

#[tokio::test]
async fn hit_de_cache_nao_volta_na_fonte() {
    let mock = Arc::new(MockDataSource::new());
    let initializer = initializer_with(&mock);

    let a = initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    let b = initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();

    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 1);
    assert_eq!(a.dashboard.total_revenue, b.dashboard.total_revenue);
    assert_eq!(a.dashboard.sale_count, b.dashboard.sale_count);
}

#[tokio::test]
async fn filtros_distintos_nunca_conflitam() {
    let mock = Arc::new(MockDataSource::new());
    let initializer = initializer_with(&mock);

    let todos = initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    let biller_1 = initializer
        .initialize_dashboard_data(ACCOUNT, filters_biller(1))
        .await
        .unwrap();

    // Duas entradas, duas idas à fonte.
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 2);
    assert_eq!(initializer.cached_entries(), 2);

    // Fixture: biller 1 vende 100 + 250; o total geral inclui mais 75.
    assert_eq!(todos.dashboard.total_revenue, Decimal::from(425));
    assert_eq!(biller_1.dashboard.total_revenue, Decimal::from(350));
}

#[tokio::test]
async fn clear_cache_forca_novas_queries() {
    let mock = Arc::new(MockDataSource::new());
    let initializer = initializer_with(&mock);

    initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 1);

    initializer.clear_cache();
    assert_eq!(initializer.cached_entries(), 0);

    initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn refresh_remove_somente_a_chave_correspondente() {
    let mock = Arc::new(MockDataSource::new());
    let initializer = initializer_with(&mock);

    initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    initializer
        .initialize_dashboard_data(ACCOUNT, filters_biller(1))
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 2);

    // Refresh só da chave "todos": refaz essa query...
    initializer
        .refresh_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 3);

    // ...mas a outra continua servida do cache.
    initializer
        .initialize_dashboard_data(ACCOUNT, filters_biller(1))
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn entrada_expirada_pelo_ttl_refaz_o_fetch() {
    let mock = Arc::new(MockDataSource::new());
    let source: Arc<dyn DataSource> = mock.clone();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 8, 27, 9, 0, 0).unwrap(),
    ));
    let initializer = DataInitializer::with_cache_policy(
        source,
        clock.clone(),
        Duration::seconds(300),
        64,
    );

    initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();

    // Dentro do TTL: hit.
    clock.advance(Duration::seconds(299));
    initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 1);

    // Passou do TTL: volta na fonte.
    clock.advance(Duration::seconds(2));
    initializer
        .initialize_dashboard_data(ACCOUNT, filters_all())
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn re_sync_periodico_invoca_os_callbacks() {
    let mock = Arc::new(MockDataSource::new());
    let initializer = initializer_with(&mock);

    let fired = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let fired_cb = fired.clone();
    let callback: bi_backend::cache::SyncCallback = Box::new(move |snapshot| {
        assert_eq!(snapshot.customers.len(), 4);
        fired_cb.fetch_add(1, Ordering::SeqCst);
    });

    let handle = initializer.clone().spawn_periodic_sync(
        ACCOUNT,
        std::time::Duration::from_secs(60),
        vec![callback],
    );

    // Com o relógio pausado do tokio, o sleep avança o tempo virtual e
    // o ticker dispara duas vezes dentro da janela.
    tokio::time::sleep(std::time::Duration::from_secs(121)).await;
    handle.abort();

    assert!(fired.load(Ordering::SeqCst) >= 2);
    assert!(mock.calls.today_sale.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn limite_de_entradas_descarta_a_mais_antiga() {
    let mock = Arc::new(MockDataSource::new());
    let source: Arc<dyn DataSource> = mock.clone();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 8, 27, 9, 0, 0).unwrap(),
    ));
    let initializer = DataInitializer::with_cache_policy(
        source,
        clock.clone(),
        Duration::seconds(3600),
        2,
    );

    for id in 1..=3 {
        initializer
            .initialize_dashboard_data(ACCOUNT, filters_biller(id))
            .await
            .unwrap();
        // Separa os inserted_at para a eviction ter uma ordem definida.
        clock.advance(Duration::seconds(1));
    }
    assert_eq!(initializer.cached_entries(), 2);
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 3);

    // A chave mais antiga (biller 1) foi descartada: refaz a query.
    initializer
        .initialize_dashboard_data(ACCOUNT, filters_biller(1))
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 4);

    // As mais recentes continuam lá.
    initializer
        .initialize_dashboard_data(ACCOUNT, filters_biller(3))
        .await
        .unwrap();
    assert_eq!(mock.calls.dashboard.load(Ordering::SeqCst), 4);
}
