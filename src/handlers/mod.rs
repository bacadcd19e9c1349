pub mod analytics;
pub mod cache_admin;
pub mod health;
pub mod hierarchy;
pub mod kpi;
