use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use vulnguard_auth::middleware::RequireAuth;
use vulnguard_core::error_builder;
use vulnguard_core::problemdetails::Problem;
use vulnguard_entities::assets;
use vulnguard_entities::types::AssetType;

use crate::services::{AssetError, AssetService, CreateAssetRequest, UpdateAssetRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_assets,
        get_asset,
        list_assets_by_type,
        create_asset,
        update_asset,
        delete_asset
    ),
    components(schemas(AssetResponse, CreateAssetRequest, UpdateAssetRequest, AssetType)),
    info(
        title = "Assets API",
        description = "Attack-surface asset registry",
        version = "1.0.0"
    )
)]
pub struct AssetsApiDoc;

pub fn configure_routes() -> Router<Arc<AssetService>> {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/assets", post(create_asset))
        .route("/assets/{id}", get(get_asset))
        .route("/assets/{id}", put(update_asset))
        .route("/assets/{id}", delete(delete_asset))
        .route("/assets/type/{asset_type}", get(list_assets_by_type))
}

/// An asset under monitoring
#[derive(Serialize, ToSchema)]
pub struct AssetResponse {
    pub id: i32,
    #[schema(example = "Customer Portal")]
    pub name: String,
    pub asset_type: AssetType,
    #[schema(example = "portal.example.com")]
    pub address: String,
    pub description: Option<String>,
    /// Business importance, 1 (low) to 5 (critical)
    pub criticality: i32,
    pub active: bool,
    pub created_at: String,
    pub last_scanned_at: Option<String>,
}

impl From<&assets::Model> for AssetResponse {
    fn from(model: &assets::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            asset_type: model.asset_type,
            address: model.address.clone(),
            description: model.description.clone(),
            criticality: model.criticality,
            active: model.active,
            created_at: model.created_at.to_rfc3339(),
            last_scanned_at: model.last_scanned_at.map(|t| t.to_rfc3339()),
        }
    }
}

fn into_problem(err: AssetError) -> Problem {
    if let AssetError::Database(ref e) = err {
        error!("Database error in asset handler: {}", e);
    }
    error_builder::from_service_error(&err.into())
}

/// List all active assets
#[utoipa::path(
    tag = "2. Asset Management",
    get,
    path = "/assets",
    responses(
        (status = 200, description = "Active assets", body = Vec<AssetResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn list_assets(
    State(service): State<Arc<AssetService>>,
    RequireAuth(_auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let assets = service.get_all_active().await.map_err(into_problem)?;
    Ok(Json(
        assets.iter().map(AssetResponse::from).collect::<Vec<_>>(),
    ))
}

/// Fetch a single asset by id
#[utoipa::path(
    tag = "2. Asset Management",
    get,
    path = "/assets/{id}",
    params(("id" = i32, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset", body = AssetResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn get_asset(
    State(service): State<Arc<AssetService>>,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let asset = service.get_by_id(id).await.map_err(into_problem)?;
    Ok(Json(AssetResponse::from(&asset)))
}

/// List assets of a given type
#[utoipa::path(
    tag = "2. Asset Management",
    get,
    path = "/assets/type/{asset_type}",
    params(("asset_type" = AssetType, Path, description = "Asset type")),
    responses(
        (status = 200, description = "Assets of the requested type", body = Vec<AssetResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn list_assets_by_type(
    State(service): State<Arc<AssetService>>,
    RequireAuth(_auth): RequireAuth,
    Path(asset_type): Path<AssetType>,
) -> Result<impl IntoResponse, Problem> {
    let assets = service.get_by_type(asset_type).await.map_err(into_problem)?;
    Ok(Json(
        assets.iter().map(AssetResponse::from).collect::<Vec<_>>(),
    ))
}

/// Register a new asset
#[utoipa::path(
    tag = "2. Asset Management",
    post,
    path = "/assets",
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Asset created", body = AssetResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn create_asset(
    State(service): State<Arc<AssetService>>,
    RequireAuth(_auth): RequireAuth,
    Json(request): Json<CreateAssetRequest>,
) -> Result<impl IntoResponse, Problem> {
    let asset = service.create(request).await.map_err(into_problem)?;
    Ok((StatusCode::CREATED, Json(AssetResponse::from(&asset))))
}

/// Replace an asset's attributes
#[utoipa::path(
    tag = "2. Asset Management",
    put,
    path = "/assets/{id}",
    params(("id" = i32, Path, description = "Asset id")),
    request_body = UpdateAssetRequest,
    responses(
        (status = 200, description = "Asset updated", body = AssetResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn update_asset(
    State(service): State<Arc<AssetService>>,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAssetRequest>,
) -> Result<impl IntoResponse, Problem> {
    let asset = service.update(id, request).await.map_err(into_problem)?;
    Ok(Json(AssetResponse::from(&asset)))
}

/// Retire an asset (soft delete)
#[utoipa::path(
    tag = "2. Asset Management",
    delete,
    path = "/assets/{id}",
    params(("id" = i32, Path, description = "Asset id")),
    responses(
        (status = 204, description = "Asset retired"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
async fn delete_asset(
    State(service): State<Arc<AssetService>>,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    service.soft_delete(id).await.map_err(into_problem)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use vulnguard_auth::AuthContext;
    use vulnguard_database::test_utils::setup_test_db;
    use vulnguard_entities::users;

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
    async fn test_list_assets_rejects_missing_token() {
        let db = setup_test_db().await;
        let app = configure_routes().with_state(Arc::new(AssetService::new(db)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_assets_serves_authenticated_request() {
        let db = setup_test_db().await;
        let app = configure_routes().with_state(Arc::new(AssetService::new(db)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets")
                    .extension(analyst())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_asset_errors_map_through_shared_taxonomy() {
        let problem = into_problem(AssetError::NotFound(7));
        assert_eq!(problem.status_code, StatusCode::NOT_FOUND);

        let problem = into_problem(AssetError::Validation(vec![
            "name is required".to_string(),
            "criticality must be between 1 and 5".to_string(),
        ]));
        assert_eq!(problem.status_code, StatusCode::BAD_REQUEST);
        let violations = problem.body.get("violations").unwrap();
        assert_eq!(violations.as_array().unwrap().len(), 2);
    }
}
