pub mod analytics;
pub mod dashboard;
pub mod filters;
pub mod hierarchy;
pub mod sales;
