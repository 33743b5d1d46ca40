pub mod handlers;
pub mod services;

pub use services::{AssetError, AssetService, CreateAssetRequest, UpdateAssetRequest};

mod plugin;
pub use plugin::AssetsPlugin;
