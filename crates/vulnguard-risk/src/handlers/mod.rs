use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, OpenApi};
use vulnguard_auth::middleware::RequireAuth;
use vulnguard_core::error_builder;
use vulnguard_core::problemdetails::Problem;
use vulnguard_entities::types::Severity;

use crate::services::{Dashboard, DashboardService, FilteredDashboard, RiskError, ScoredFinding};

#[derive(OpenApi)]
#[openapi(
    paths(get_dashboard, get_filtered_dashboard),
    components(schemas(Dashboard, FilteredDashboard, ScoredFinding, Severity)),
    info(
        title = "Dashboard API",
        description = "Attack-surface aggregation and risk ranking",
        version = "1.0.0"
    )
)]
pub struct DashboardApiDoc;

pub fn configure_routes() -> Router<Arc<DashboardService>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/filter", get(get_filtered_dashboard))
}

#[derive(Deserialize, IntoParams)]
pub struct SeverityFilter {
    /// Severity name, case-insensitive
    pub severity: String,
}

fn into_problem(err: RiskError) -> Problem {
    match err {
        RiskError::Database(e) => {
            error!("Database error in dashboard handler: {}", e);
            error_builder::internal_server_error().build()
        }
        RiskError::Integrity(message) => {
            error!("Integrity error in dashboard handler: {}", message);
            error_builder::internal_server_error().build()
        }
    }
}

/// Aggregated attack-surface dashboard
#[utoipa::path(
    tag = "4. Dashboard",
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn get_dashboard(
    State(service): State<Arc<DashboardService>>,
    RequireAuth(_auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let dashboard = service.get_dashboard().await.map_err(into_problem)?;
    Ok(Json(dashboard))
}

/// Dashboard restricted to one severity
#[utoipa::path(
    tag = "4. Dashboard",
    get,
    path = "/dashboard/filter",
    params(SeverityFilter),
    responses(
        (status = 200, description = "Filtered dashboard", body = FilteredDashboard),
        (status = 400, description = "Unknown severity"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn get_filtered_dashboard(
    State(service): State<Arc<DashboardService>>,
    RequireAuth(_auth): RequireAuth,
    Query(filter): Query<SeverityFilter>,
) -> Result<impl IntoResponse, Problem> {
    let severity = Severity::from_str(&filter.severity).map_err(|_| {
        error_builder::validation_failed(&[format!("unknown severity: {}", filter.severity)])
            .build()
    })?;

    let filtered = service
        .get_filtered_dashboard(severity)
        .await
        .map_err(into_problem)?;
    Ok(Json(filtered))
}
