use crate::{context::AuthContext, state::AuthState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use vulnguard_core::error_builder::ErrorBuilder;

/// Resolves the bearer token (if any) and attaches an `AuthContext`
/// extension. Requests without a valid token pass through untouched;
/// the `RequireAuth` extractor rejects them at the handler boundary,
/// which keeps public endpoints (login, register, health) working.
pub async fn auth_middleware(
    State(app_state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> axum::response::Response {
    if let Some(token) = extract_bearer_token(&req) {
        match app_state.auth_service.validate_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(AuthContext::new(user));
            }
            Err(e) => {
                tracing::debug!("bearer token rejected: {}", e);
            }
        }
    }

    next.run(req).await
}

fn extract_bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
}

/// Extractor that rejects unauthenticated requests with an RFC 7807
/// 401 response.
///
/// Usage in handler:
/// ```ignore
/// async fn list_assets(
///     RequireAuth(auth): RequireAuth,
///     State(state): State<Arc<AppState>>,
/// ) -> Result<impl IntoResponse, Problem> { ... }
/// ```
pub struct RequireAuth(pub AuthContext);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                ErrorBuilder::new(StatusCode::UNAUTHORIZED)
                    .type_("https://vulnguard.dev/probs/authentication-required")
                    .title("Authentication Required")
                    .detail("This operation requires a valid bearer token")
                    .build()
                    .into_response()
            })?;

        Ok(RequireAuth(context))
    }
}
