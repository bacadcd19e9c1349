// src/main.rs

use std::env;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bi_backend::{cache::SyncCallback, config::AppState, docs::ApiDoc, handlers};

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Re-sync periódico de vendas/clientes, se configurado.
    if let Ok(raw) = env::var("SYNC_INTERVAL_SECS") {
        let secs: u64 = raw.parse().expect("SYNC_INTERVAL_SECS deve ser um inteiro");
        let account_id: i64 = env::var("SYNC_ACCOUNT_ID")
            .expect("SYNC_ACCOUNT_ID deve ser definida junto com SYNC_INTERVAL_SECS")
            .parse()
            .expect("SYNC_ACCOUNT_ID deve ser um inteiro");

        let log_snapshot: SyncCallback = Box::new(|snapshot| {
            tracing::info!(
                "Re-sync: {} clientes, {} warehouses no agregado do dia",
                snapshot.customers.len(),
                snapshot.today_sale.warehouses.len()
            );
        });
        app_state.initializer.clone().spawn_periodic_sync(
            account_id,
            std::time::Duration::from_secs(secs),
            vec![log_snapshot],
        );
        tracing::info!("⏱️ Re-sync periódico a cada {}s (account {})", secs, account_id);
    }

    // Rotas de KPI
    let kpi_routes = Router::new()
        .route("/dashboard", get(handlers::kpi::get_dashboard))
        .route(
            "/gross-profit-margin",
            get(handlers::kpi::get_gross_profit_margin),
        )
        .route("/today-sale", get(handlers::kpi::get_today_sale));

    // Rotas de hierarquia (billers -> warehouses -> clientes)
    let hierarchy_routes = Router::new()
        .route("/billers", get(handlers::hierarchy::get_billers))
        .route("/warehouses", get(handlers::hierarchy::get_warehouses))
        .route("/customers", get(handlers::hierarchy::get_customers));

    // Rotas de analytics (views derivadas)
    let analytics_routes = Router::new()
        .route("/segmentation", get(handlers::analytics::get_segmentation))
        .route("/activation", get(handlers::analytics::get_activation))
        .route(
            "/revenue-breakdown",
            get(handlers::analytics::get_revenue_breakdown),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health::health))
        .nest("/api/kpi", kpi_routes)
        .nest("/api/hierarchy", hierarchy_routes)
        .nest("/api/analytics", analytics_routes)
        .route("/api/cache/clear", post(handlers::cache_admin::clear_cache))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
