use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use utoipa::OpenApi;
use vulnguard_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, VulnguardPlugin,
};

use crate::{handlers, AssetService};

/// Assets Plugin providing the asset registry and its REST surface
pub struct AssetsPlugin;

impl AssetsPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssetsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnguardPlugin for AssetsPlugin {
    fn name(&self) -> &'static str {
        "assets"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let asset_service = Arc::new(AssetService::new(db));
            context.register_service(asset_service);

            tracing::debug!("Assets plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let asset_service = context.require_service::<AssetService>();

        let routes = handlers::configure_routes().with_state(asset_service);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(handlers::AssetsApiDoc::openapi())
    }
}
