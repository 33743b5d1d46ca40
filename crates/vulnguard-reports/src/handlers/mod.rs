use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;
use vulnguard_auth::middleware::RequireAuth;
use vulnguard_core::error_builder::{self, ErrorBuilder};
use vulnguard_core::problemdetails::Problem;

use crate::renderer::DocumentRenderer;
use crate::services::{AssetReport, Report, ReportError, ReportFinding, ReportService};

#[derive(OpenApi)]
#[openapi(
    paths(get_json_report, get_pdf_report),
    components(schemas(Report, AssetReport, ReportFinding)),
    info(
        title = "Reports API",
        description = "Attack-surface report assembly and export",
        version = "1.0.0"
    )
)]
pub struct ReportsApiDoc;

pub struct ReportsState {
    pub report_service: Arc<ReportService>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

pub fn configure_routes() -> Router<Arc<ReportsState>> {
    Router::new()
        .route("/reports/json", get(get_json_report))
        .route("/reports/pdf", get(get_pdf_report))
}

fn into_problem(err: ReportError) -> Problem {
    match err {
        ReportError::Database(e) => {
            error!("Database error in report handler: {}", e);
            error_builder::internal_server_error().build()
        }
        ReportError::Integrity(message) => {
            error!("Integrity error in report handler: {}", message);
            error_builder::internal_server_error().build()
        }
    }
}

/// Structured attack-surface report
#[utoipa::path(
    tag = "5. Reports",
    get,
    path = "/reports/json",
    responses(
        (status = 200, description = "Report", body = Report),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn get_json_report(
    State(state): State<Arc<ReportsState>>,
    RequireAuth(_auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let report = state
        .report_service
        .build_report()
        .await
        .map_err(into_problem)?;
    Ok(Json(report))
}

/// PDF export of the attack-surface report
#[utoipa::path(
    tag = "5. Reports",
    get,
    path = "/reports/pdf",
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Document rendering failed")
    ),
    security(("bearer_auth" = []))
)]
async fn get_pdf_report(
    State(state): State<Arc<ReportsState>>,
    RequireAuth(_auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let report = state
        .report_service
        .build_report()
        .await
        .map_err(into_problem)?;

    let rendered = state.renderer.render(&report).map_err(|e| {
        error!("Report rendering failed: {}", e);
        ErrorBuilder::new(StatusCode::BAD_GATEWAY)
            .type_("https://vulnguard.dev/probs/rendering-failed")
            .title("Rendering Failed")
            .detail("The report could not be rendered to a document")
            .build()
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, state.renderer.content_type()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"vulnguard-report.pdf\"",
            ),
        ],
        rendered,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::PdfRenderer;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;
    use vulnguard_auth::AuthContext;
    use vulnguard_core::SystemClock;
    use vulnguard_database::test_utils::setup_test_db;
    use vulnguard_entities::users;

    async fn state() -> Arc<ReportsState> {
        let db = setup_test_db().await;
        Arc::new(ReportsState {
            report_service: Arc::new(ReportService::new(db, Arc::new(SystemClock))),
            renderer: Arc::new(PdfRenderer::new()),
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
    async fn test_json_report_rejects_missing_token() {
        let app = configure_routes().with_state(state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/reports/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_json_report_serves_authenticated_request() {
        let app = configure_routes().with_state(state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/reports/json")
                    .extension(analyst())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
