use crate::auth_service::AuthError;
use crate::context::UserSchema;
use crate::middleware::RequireAuth;
use crate::state::AuthState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use vulnguard_core::error_builder::ErrorBuilder;
use vulnguard_core::problemdetails::Problem;

#[derive(OpenApi)]
#[openapi(
    paths(register, login, current_user),
    components(schemas(RegisterRequest, LoginRequest, TokenResponse, UserSchema)),
    info(
        title = "Auth API",
        description = "User registration and bearer-token login",
        version = "1.0.0"
    )
)]
pub struct AuthApiDoc;

pub fn configure_routes() -> Router<Arc<AuthState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(current_user))
}

/// Request to create a new account
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Jordan Reyes")]
    pub name: String,
    #[schema(example = "jordan@example.com")]
    pub email: String,
    #[schema(example = "a-strong-password")]
    pub password: String,
}

/// Login credentials
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jordan@example.com")]
    pub email: String,
    pub password: String,
}

/// Bearer token issued on successful login
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    /// Opaque bearer token; store it, it is not shown again
    #[schema(example = "vg_9f2c...")]
    pub token: String,
    pub user: UserSchema,
}

/// Register a new user account
#[utoipa::path(
    tag = "1. Authentication",
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
async fn register(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Problem> {
    match state
        .auth_service
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserSchema::from(&user)))),
        Err(AuthError::DuplicateEmail(email)) => {
            Err(vulnguard_core::error_builder::conflict(format!(
                "Email already registered: {}",
                email
            ))
            .build())
        }
        Err(e) => {
            error!("Failed to register user: {}", e);
            Err(vulnguard_core::error_builder::internal_server_error().build())
        }
    }
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    tag = "1. Authentication",
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, Problem> {
    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(issued) => Ok(Json(TokenResponse {
            token: issued.token,
            user: UserSchema::from(&issued.user),
        })),
        Err(AuthError::InvalidCredentials) => Err(ErrorBuilder::new(StatusCode::UNAUTHORIZED)
            .type_("https://vulnguard.dev/probs/invalid-credentials")
            .title("Invalid Credentials")
            .detail("Email or password is incorrect")
            .build()),
        Err(e) => {
            error!("Failed to log in: {}", e);
            Err(vulnguard_core::error_builder::internal_server_error().build())
        }
    }
}

/// Return the authenticated user
#[utoipa::path(
    tag = "1. Authentication",
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = UserSchema),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
async fn current_user(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
    Json(UserSchema::from(&auth.user))
}
