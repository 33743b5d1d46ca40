use crate::auth_service::AuthService;
use std::sync::Arc;

/// Shared state for the auth middleware and handlers.
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}
