mod dashboard_service;
mod types;

pub use dashboard_service::DashboardService;
pub use types::{Dashboard, FilteredDashboard, RiskError, ScoredFinding};
