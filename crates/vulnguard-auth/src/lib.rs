mod auth_service;
mod context;
pub mod middleware;
mod plugin;
pub mod handlers;
pub mod state;

pub use auth_service::{AuthError, AuthService, IssuedToken};
pub use context::AuthContext;
pub use middleware::{auth_middleware, RequireAuth};
pub use plugin::AuthPlugin;
pub use state::AuthState;
