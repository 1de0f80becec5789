pub mod app;
pub mod customers;
pub mod dashboard;
pub mod filters;
mod style;

pub use app::{start_dashboard, DashboardTui};
