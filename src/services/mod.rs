pub mod analytics;
pub mod dashboard;
pub use dashboard::DashboardService;
