use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use vulnguard_auth::middleware::RequireAuth;
use vulnguard_core::error_builder;
use vulnguard_core::problemdetails::Problem;
use vulnguard_entities::types::Severity;
use vulnguard_entities::vulnerabilities;

use crate::services::{ScanError, ScanSimulator, VulnerabilityService};

#[derive(OpenApi)]
#[openapi(
    paths(
        scan_asset,
        list_by_asset,
        list_open,
        list_by_severity,
        get_finding,
        remediate_finding
    ),
    components(schemas(FindingResponse, RemediationResponse, Severity)),
    info(
        title = "Scans API",
        description = "Simulated vulnerability scanning and finding lifecycle",
        version = "1.0.0"
    )
)]
pub struct ScansApiDoc;

pub struct ScansState {
    pub simulator: Arc<ScanSimulator>,
    pub vulnerabilities: Arc<VulnerabilityService>,
}

pub fn configure_routes() -> Router<Arc<ScansState>> {
    Router::new()
        .route("/scans/asset/{asset_id}", post(scan_asset))
        .route("/scans/asset/{asset_id}", get(list_by_asset))
        .route("/scans/open", get(list_open))
        .route("/scans/severity/{severity}", get(list_by_severity))
        .route("/scans/{id}", get(get_finding))
        .route("/scans/{id}/remediate", patch(remediate_finding))
}

/// A vulnerability finding
#[derive(Serialize, ToSchema)]
pub struct FindingResponse {
    pub id: i32,
    #[schema(example = "CVE-2026-4821")]
    pub cve_id: String,
    #[schema(example = "SQL Injection")]
    pub title: String,
    pub severity: Severity,
    pub cvss_score: f64,
    pub discovered_at: String,
    pub age_in_days: i32,
    pub remediated: bool,
    /// Cached score from the last scoring pass
    pub risk_score: f64,
    pub asset_id: i32,
}

impl From<&vulnerabilities::Model> for FindingResponse {
    fn from(model: &vulnerabilities::Model) -> Self {
        Self {
            id: model.id,
            cve_id: model.cve_id.clone(),
            title: model.title.clone(),
            severity: model.severity,
            cvss_score: model.cvss_score,
            discovered_at: model.discovered_at.to_rfc3339(),
            age_in_days: model.age_in_days,
            remediated: model.remediated,
            risk_score: model.risk_score,
            asset_id: model.asset_id,
        }
    }
}

/// Confirmation envelope for a remediation
#[derive(Serialize, ToSchema)]
pub struct RemediationResponse {
    #[schema(example = "Vulnerability marked as remediated")]
    pub message: String,
    pub id: i32,
    pub cve_id: String,
    pub remediated: bool,
}

fn into_problem(err: ScanError) -> Problem {
    match err {
        ScanError::AssetNotFound(id) => error_builder::not_found(format!("Asset {}", id)).build(),
        ScanError::FindingNotFound(id) => {
            error_builder::not_found(format!("Finding {}", id)).build()
        }
        ScanError::Validation(violations) => {
            error_builder::validation_failed(&violations).build()
        }
        ScanError::Database(e) => {
            error!("Database error in scan handler: {}", e);
            error_builder::internal_server_error().build()
        }
        ScanError::Integrity(message) => {
            error!("Integrity error in scan handler: {}", message);
            error_builder::internal_server_error().build()
        }
    }
}

/// Run a simulated scan against an asset
#[utoipa::path(
    tag = "3. Vulnerability Scanning",
    post,
    path = "/scans/asset/{asset_id}",
    params(("asset_id" = i32, Path, description = "Asset id")),
    responses(
        (status = 201, description = "Findings generated", body = Vec<FindingResponse>),
        (status = 400, description = "Asset is inactive"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn scan_asset(
    State(state): State<Arc<ScansState>>,
    RequireAuth(_auth): RequireAuth,
    Path(asset_id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let findings = state
        .simulator
        .scan_asset(asset_id)
        .await
        .map_err(into_problem)?;
    Ok((
        StatusCode::CREATED,
        Json(findings.iter().map(FindingResponse::from).collect::<Vec<_>>()),
    ))
}

/// All findings for an asset, open and remediated
#[utoipa::path(
    tag = "3. Vulnerability Scanning",
    get,
    path = "/scans/asset/{asset_id}",
    params(("asset_id" = i32, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Findings", body = Vec<FindingResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn list_by_asset(
    State(state): State<Arc<ScansState>>,
    RequireAuth(_auth): RequireAuth,
    Path(asset_id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let findings = state
        .vulnerabilities
        .get_by_asset(asset_id)
        .await
        .map_err(into_problem)?;
    Ok(Json(
        findings.iter().map(FindingResponse::from).collect::<Vec<_>>(),
    ))
}

/// Open findings across all assets, highest risk first
#[utoipa::path(
    tag = "3. Vulnerability Scanning",
    get,
    path = "/scans/open",
    responses(
        (status = 200, description = "Open findings sorted by risk score", body = Vec<FindingResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn list_open(
    State(state): State<Arc<ScansState>>,
    RequireAuth(_auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let findings = state
        .vulnerabilities
        .get_all_open()
        .await
        .map_err(into_problem)?;
    Ok(Json(
        findings.iter().map(FindingResponse::from).collect::<Vec<_>>(),
    ))
}

/// Findings of one severity regardless of remediation state
#[utoipa::path(
    tag = "3. Vulnerability Scanning",
    get,
    path = "/scans/severity/{severity}",
    params(("severity" = Severity, Path, description = "Severity name, case-insensitive")),
    responses(
        (status = 200, description = "Findings", body = Vec<FindingResponse>),
        (status = 400, description = "Unknown severity"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn list_by_severity(
    State(state): State<Arc<ScansState>>,
    RequireAuth(_auth): RequireAuth,
    Path(severity): Path<String>,
) -> Result<impl IntoResponse, Problem> {
    let severity = Severity::from_str(&severity).map_err(|_| {
        error_builder::validation_failed(&[format!("unknown severity: {}", severity)]).build()
    })?;

    let findings = state
        .vulnerabilities
        .get_by_severity(severity)
        .await
        .map_err(into_problem)?;
    Ok(Json(
        findings.iter().map(FindingResponse::from).collect::<Vec<_>>(),
    ))
}

/// Fetch a single finding
#[utoipa::path(
    tag = "3. Vulnerability Scanning",
    get,
    path = "/scans/{id}",
    params(("id" = i32, Path, description = "Finding id")),
    responses(
        (status = 200, description = "Finding", body = FindingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Finding not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn get_finding(
    State(state): State<Arc<ScansState>>,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let finding = state
        .vulnerabilities
        .get_by_id(id)
        .await
        .map_err(into_problem)?;
    Ok(Json(FindingResponse::from(&finding)))
}

/// Mark a finding remediated (idempotent)
#[utoipa::path(
    tag = "3. Vulnerability Scanning",
    patch,
    path = "/scans/{id}/remediate",
    params(("id" = i32, Path, description = "Finding id")),
    responses(
        (status = 200, description = "Finding remediated", body = RemediationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Finding not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn remediate_finding(
    State(state): State<Arc<ScansState>>,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let finding = state
        .vulnerabilities
        .mark_remediated(id)
        .await
        .map_err(into_problem)?;
    Ok(Json(RemediationResponse {
        message: "Vulnerability marked as remediated".to_string(),
        id: finding.id,
        cve_id: finding.cve_id,
        remediated: finding.remediated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use vulnguard_auth::AuthContext;
    use vulnguard_core::{SeededRandom, SystemClock};
    use vulnguard_database::test_utils::setup_test_db;
    use vulnguard_entities::users;

    async fn state() -> Arc<ScansState> {
        let db = setup_test_db().await;
        Arc::new(ScansState {
            simulator: Arc::new(ScanSimulator::new(
                db.clone(),
                Arc::new(SystemClock),
                Arc::new(SeededRandom::from_seed(1)),
            )),
            vulnerabilities: Arc::new(VulnerabilityService::new(db)),
        })
    }

    fn analyst() -> AuthContext {
        AuthContext::new(users::Model {
            id: 1,
            name: "Analyst".to_string(),
            email: "analyst@vulnguard.local".to_string(),
            password_hash: "unused".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_open_findings_reject_missing_token() {
        let app = configure_routes().with_state(state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/scans/open")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_open_findings_serve_authenticated_request() {
        let app = configure_routes().with_state(state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/scans/open")
                    .extension(analyst())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
