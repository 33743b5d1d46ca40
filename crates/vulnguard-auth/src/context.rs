use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vulnguard_entities::users;

/// Simplified user schema for OpenAPI documentation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSchema {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<&users::Model> for UserSchema {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Authenticated principal attached to the request by the auth
/// middleware. Handlers obtain it through the `RequireAuth` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user: users::Model,
}

impl AuthContext {
    pub fn new(user: users::Model) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> i32 {
        self.user.id
    }
}
