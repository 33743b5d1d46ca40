use anyhow::Context;
use axum::{routing::get, Json};
use clap::Args;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use utoipa_swagger_ui::SwaggerUi;

use vulnguard_assets::AssetsPlugin;
use vulnguard_auth::{auth_middleware, AuthPlugin, AuthService, AuthState};
use vulnguard_core::plugin::PluginManager;
use vulnguard_core::{Clock, RandomSource, SeededRandom, SystemClock};
use vulnguard_reports::ReportsPlugin;
use vulnguard_risk::DashboardPlugin;
use vulnguard_scans::ScansPlugin;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "VULNGUARD_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(
        long,
        default_value = "sqlite://vulnguard.db?mode=rwc",
        env = "VULNGUARD_DATABASE_URL"
    )]
    pub database_url: String,

    /// Email for the initial admin user created when no users exist
    #[arg(
        long,
        default_value = "admin@vulnguard.local",
        env = "VULNGUARD_ADMIN_EMAIL"
    )]
    pub admin_email: String,
}

impl ServeCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        debug!("Initializing database connection...");
        let db = vulnguard_database::establish_connection(&self.database_url)
            .await
            .context("Failed to connect to database")?;

        let mut plugin_manager = PluginManager::new();

        // Core services every plugin can depend on
        {
            let context = plugin_manager.service_context();
            context.register_service(db.clone());
            context.register_service::<dyn Clock>(Arc::new(SystemClock));
            context.register_service::<dyn RandomSource>(Arc::new(SeededRandom::from_entropy()));
        }

        plugin_manager.register_plugin(Box::new(AuthPlugin::new()));
        plugin_manager.register_plugin(Box::new(AssetsPlugin::new()));
        plugin_manager.register_plugin(Box::new(ScansPlugin::new()));
        plugin_manager.register_plugin(Box::new(DashboardPlugin::new()));
        plugin_manager.register_plugin(Box::new(ReportsPlugin::new()));

        plugin_manager
            .initialize_plugins()
            .await
            .context("Failed to initialize plugins")?;

        let auth_service = plugin_manager
            .service_context()
            .require_service::<AuthService>();
        bootstrap_admin(auth_service, &self.admin_email).await?;

        let auth_state = plugin_manager
            .service_context()
            .require_service::<AuthState>();

        let api_doc = plugin_manager
            .get_unified_openapi()
            .map_err(|e| anyhow::anyhow!("Failed to build OpenAPI schema: {}", e))?;

        let app = plugin_manager
            .build_application()
            .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
            .route("/api/health", get(health))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                auth_middleware,
            ))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let listener = TcpListener::bind(&self.address).await?;
        info!("VulnGuard server listening on {}", self.address);
        info!("Swagger UI available at http://{}/swagger-ui", self.address);

        axum::serve(listener, app).await?;
        info!("Server exited");
        Ok(())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "vulnguard",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

/// Create the initial admin account on a fresh database. The generated
/// password is printed exactly once.
async fn bootstrap_admin(auth_service: Arc<AuthService>, email: &str) -> anyhow::Result<()> {
    if auth_service.has_users().await? {
        return Ok(());
    }

    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect();

    auth_service
        .register("Administrator", email, &password)
        .await
        .context("Failed to create initial admin user")?;

    info!("Created initial admin user {}", email);
    println!("Initial admin credentials");
    println!("  email:    {}", email);
    println!("  password: {}", password);
    println!("Store this password now; it will not be shown again.");
    Ok(())
}
