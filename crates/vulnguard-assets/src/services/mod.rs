mod asset_service;
mod types;

pub use asset_service::AssetService;
pub use types::{AssetError, CreateAssetRequest, UpdateAssetRequest};
