use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use utoipa::OpenApi;
use vulnguard_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, VulnguardPlugin,
};
use vulnguard_core::Clock;

use crate::handlers::{self, ReportsState};
use crate::renderer::{DocumentRenderer, PdfRenderer};
use crate::ReportService;

/// Reports Plugin providing report assembly and PDF export
pub struct ReportsPlugin;

impl ReportsPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReportsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnguardPlugin for ReportsPlugin {
    fn name(&self) -> &'static str {
        "reports"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();
            let clock = context.require_service::<dyn Clock>();

            let report_service = Arc::new(ReportService::new(db, clock));
            let renderer: Arc<dyn DocumentRenderer> = Arc::new(PdfRenderer::new());

            context.register_service(Arc::new(ReportsState {
                report_service,
                renderer,
            }));

            tracing::debug!("Reports plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let state = context.require_service::<ReportsState>();

        let routes = handlers::configure_routes().with_state(state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(handlers::ReportsApiDoc::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_plugin_name() {
        let plugin = ReportsPlugin::new();
        assert_eq!(plugin.name(), "reports");
    }
}
