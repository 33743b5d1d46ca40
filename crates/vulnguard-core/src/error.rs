//! Common error types used across all VulnGuard services

use thiserror::Error;

/// Common service error taxonomy.
///
/// `Validation` carries every violation found for the request, not just
/// the first one. `Integrity` marks upstream data corruption (a finding
/// without a severity or owning asset) and is never mapped to a client
/// error.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Validation failed: {}", violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Data integrity violation: {message}")]
    Integrity { message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn validation(violations: Vec<String>) -> Self {
        Self::Validation { violations }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_all_violations() {
        let err = ServiceError::validation(vec![
            "name is required".to_string(),
            "criticality must be between 1 and 5".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("criticality must be between 1 and 5"));
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("Asset 42");
        assert_eq!(err.to_string(), "Not found: Asset 42");
    }
}
