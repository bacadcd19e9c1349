// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- KPI ---
        handlers::kpi::get_dashboard,
        handlers::kpi::get_gross_profit_margin,
        handlers::kpi::get_today_sale,

        // --- Hierarquia ---
        handlers::hierarchy::get_billers,
        handlers::hierarchy::get_warehouses,
        handlers::hierarchy::get_customers,

        // --- Analytics ---
        handlers::analytics::get_segmentation,
        handlers::analytics::get_activation,
        handlers::analytics::get_revenue_breakdown,

        // --- Cache ---
        handlers::cache_admin::clear_cache,
    ),
    components(
        schemas(
            // --- Hierarquia ---
            models::hierarchy::Biller,
            models::hierarchy::Warehouse,
            models::hierarchy::Customer,

            // --- Vendas ---
            models::sales::Sale,
            models::sales::TodaySaleEntry,
            models::sales::TodaySaleReport,

            // --- Dashboard ---
            models::dashboard::DashboardData,
            models::dashboard::DashboardBundle,
            models::dashboard::GrossProfitMargin,

            // --- Analytics ---
            models::analytics::SegmentName,
            models::analytics::SegmentSummary,
            models::analytics::CustomerSegmentation,
            models::analytics::SmartActivationMetrics,
            models::analytics::RevenueBreakdownEntry,
            models::analytics::RevenueBreakdown,

            // --- Filtros ---
            models::filters::FilterSelection,
            models::filters::DateRange,
            models::filters::DashboardFilters,
            handlers::kpi::Period,
        )
    ),
    tags(
        (name = "Health", description = "Liveness e saúde da fonte de dados"),
        (name = "KPI", description = "Agregados do dashboard"),
        (name = "Hierarquia", description = "Billers, warehouses e clientes"),
        (name = "Analytics", description = "Views derivadas, recomputadas por request"),
        (name = "Cache", description = "Administração do cache de dashboard"),
    )
)]
pub struct ApiDoc;
