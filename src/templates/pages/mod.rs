pub mod dashboard;

pub use dashboard::{dashboard_page, format_price, DashboardVm};
