use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use utoipa::OpenApi;
use vulnguard_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, VulnguardPlugin,
};
use vulnguard_core::{Clock, RandomSource};

use crate::handlers::{self, ScansState};
use crate::{ScanSimulator, VulnerabilityService};

/// Scans Plugin providing the scan simulator and the finding lifecycle
pub struct ScansPlugin;

impl ScansPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScansPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnguardPlugin for ScansPlugin {
    fn name(&self) -> &'static str {
        "scans"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();
            let clock = context.require_service::<dyn Clock>();
            let random = context.require_service::<dyn RandomSource>();

            let simulator = Arc::new(ScanSimulator::new(db.clone(), clock, random));
            let vulnerabilities = Arc::new(VulnerabilityService::new(db));

            context.register_service(simulator.clone());
            context.register_service(vulnerabilities.clone());
            context.register_service(Arc::new(ScansState {
                simulator,
                vulnerabilities,
            }));

            tracing::debug!("Scans plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let state = context.require_service::<ScansState>();

        let routes = handlers::configure_routes().with_state(state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(handlers::ScansApiDoc::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scans_plugin_name() {
        let plugin = ScansPlugin::new();
        assert_eq!(plugin.name(), "scans");
    }
}
