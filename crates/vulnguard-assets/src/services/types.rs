use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;
use vulnguard_core::ServiceError;
use vulnguard_entities::types::AssetType;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Asset not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// The HTTP layer maps asset errors through the shared taxonomy so the
// problem responses stay uniform across services.
impl From<AssetError> for ServiceError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Database(e) => ServiceError::Database(e.to_string()),
            AssetError::NotFound(id) => ServiceError::not_found(format!("Asset {}", id)),
            AssetError::Validation(violations) => ServiceError::validation(violations),
        }
    }
}

/// Request to register a new asset
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssetRequest {
    /// Display name, 2-100 characters
    #[schema(example = "Customer Portal")]
    pub name: String,
    pub asset_type: AssetType,
    /// Hostname, IP, URL or cloud resource identifier
    #[schema(example = "portal.example.com")]
    pub address: String,
    #[schema(example = "Public-facing customer portal")]
    pub description: Option<String>,
    /// Business importance, 1 (low) to 5 (critical)
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub criticality: i32,
}

/// Request to replace an existing asset's attributes
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAssetRequest {
    pub name: String,
    pub asset_type: AssetType,
    pub address: String,
    pub description: Option<String>,
    pub criticality: i32,
    /// Active flag; setting false is equivalent to a soft delete
    pub active: bool,
}
