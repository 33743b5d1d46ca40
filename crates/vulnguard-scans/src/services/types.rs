use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Asset not found: {0}")]
    AssetNotFound(i32),

    #[error("Finding not found: {0}")]
    FindingNotFound(i32),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Data integrity error: {0}")]
    Integrity(String),
}
