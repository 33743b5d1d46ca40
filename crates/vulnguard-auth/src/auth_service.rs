use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use vulnguard_database::DbConnection;
use vulnguard_entities::{api_tokens, users};

const TOKEN_PREFIX: &str = "vg_";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Token returned to the caller exactly once at login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user: users::Model,
}

#[derive(Clone)]
pub struct AuthService {
    db: Arc<DbConnection>,
}

impl AuthService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    /// Register a new user. Emails are unique, case-insensitively.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<users::Model, AuthError> {
        let email_lower = email.to_lowercase();

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&email_lower))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(AuthError::DuplicateEmail(email_lower));
        }

        let password_hash = hash_password(password)?;

        let user = users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email_lower),
            password_hash: Set(password_hash),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        debug!(user_id = user.id, "registered new user");
        Ok(user)
    }

    /// Verify credentials and issue a fresh bearer token. Only the
    /// SHA-256 digest of the token is persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email_lower = email.to_lowercase();

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(&email_lower))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token();
        api_tokens::ActiveModel {
            user_id: Set(user.id),
            token_hash: Set(hash_token(&token)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        debug!(user_id = user.id, "issued api token");
        Ok(IssuedToken { token, user })
    }

    /// Resolve a bearer token to its user. Tokens without the expected
    /// prefix are rejected before touching the database.
    pub async fn validate_token(&self, token: &str) -> Result<users::Model, AuthError> {
        if !token.starts_with(TOKEN_PREFIX) {
            return Err(AuthError::InvalidToken);
        }

        let record = api_tokens::Entity::find()
            .filter(api_tokens::Column::TokenHash.eq(hash_token(token)))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if let Some(expires_at) = record.expires_at {
            if expires_at < chrono::Utc::now() {
                return Err(AuthError::InvalidToken);
            }
        }

        users::Entity::find_by_id(record.user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// True when no users exist yet; the CLI bootstraps an admin then.
    pub async fn has_users(&self) -> Result<bool, AuthError> {
        use sea_orm::PaginatorTrait;
        let count = users::Entity::find().count(self.db.as_ref()).await?;
        Ok(count > 0)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", TOKEN_PREFIX, hex::encode(bytes))
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
