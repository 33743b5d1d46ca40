use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use utoipa::OpenApi;
use vulnguard_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, VulnguardPlugin,
};

use crate::{handlers, AuthService, AuthState};

/// Auth Plugin providing user registration, login, and the bearer-token
/// middleware state
pub struct AuthPlugin;

impl AuthPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AuthPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VulnguardPlugin for AuthPlugin {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let auth_service = Arc::new(AuthService::new(db.clone()));
            context.register_service(auth_service.clone());

            let auth_state = Arc::new(AuthState::new(auth_service));
            context.register_service(auth_state);

            tracing::debug!("Auth plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let auth_state = context.require_service::<AuthState>();

        let routes = handlers::configure_routes().with_state(auth_state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(handlers::AuthApiDoc::openapi())
    }
}
