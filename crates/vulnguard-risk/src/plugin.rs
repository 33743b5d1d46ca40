use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use utoipa::OpenApi;
use vulnguard_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, VulnguardPlugin,
};

use crate::{handlers, DashboardService};

/// Dashboard Plugin providing risk aggregation over open findings
pub struct DashboardPlugin;

impl DashboardPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DashboardPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnguardPlugin for DashboardPlugin {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let dashboard_service = Arc::new(DashboardService::new(db));
            context.register_service(dashboard_service);

            tracing::debug!("Dashboard plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let dashboard_service = context.require_service::<DashboardService>();

        let routes = handlers::configure_routes().with_state(dashboard_service);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(handlers::DashboardApiDoc::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dashboard_plugin_name() {
        let plugin = DashboardPlugin::new();
        assert_eq!(plugin.name(), "dashboard");
    }
}
