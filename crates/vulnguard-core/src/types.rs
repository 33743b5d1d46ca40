//! Shared type aliases used across all VulnGuard crates

use chrono::{DateTime as ChronoDateTime, Utc};

/// Database DateTime type used for TIMESTAMPTZ columns across all crates.
pub type DBDateTime = ChronoDateTime<Utc>;

/// Standard UTC DateTime type for API responses (serializes as ISO 8601
/// with 'Z' suffix).
///
/// # OpenAPI Schema
/// When using with utoipa, add the schema attribute:
/// ```rust
/// # use vulnguard_core::UtcDateTime;
/// # use serde::Serialize;
/// # use utoipa::ToSchema;
/// #[derive(Serialize, ToSchema)]
/// pub struct Response {
///     #[schema(value_type = String, format = DateTime)]
///     pub created_at: UtcDateTime,
/// }
/// ```
pub type UtcDateTime = ChronoDateTime<Utc>;
