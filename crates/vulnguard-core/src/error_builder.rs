use crate::error::ServiceError;
use crate::problemdetails;
use axum::http::StatusCode;
use serde::Serialize;
use std::collections::HashMap;

pub struct ErrorBuilder {
    status: StatusCode,
    type_: String,
    title: String,
    detail: String,
    instance: String,
    values: HashMap<String, serde_json::Value>,
}

impl ErrorBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            type_: String::new(),
            title: String::new(),
            detail: String::new(),
            instance: String::new(),
            values: HashMap::new(),
        }
    }

    pub fn type_(mut self, type_: impl Into<String>) -> Self {
        self.type_ = type_.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn value<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.values.insert(key.to_string(), value);
        }
        self
    }

    pub fn build(self) -> problemdetails::Problem {
        let mut problem = problemdetails::new(self.status)
            .with_type(self.type_)
            .with_title(self.title)
            .with_detail(self.detail)
            .with_instance(self.instance)
            .with_value("timestamp", chrono::Utc::now().to_rfc3339());

        for (key, value) in self.values {
            problem = problem.with_value(&key, value);
        }

        problem
    }
}

// Common error builders
pub fn internal_server_error() -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
        .type_("https://vulnguard.dev/probs/internal-server-error")
        .title("Internal Server Error")
        .detail("An unexpected error occurred while processing your request")
        .value("error_code", "INTERNAL_SERVER_ERROR")
}

pub fn not_found(resource: impl Into<String>) -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::NOT_FOUND)
        .type_("https://vulnguard.dev/probs/not-found")
        .title("Resource Not Found")
        .detail(format!("{} was not found", resource.into()))
        .value("error_code", "NOT_FOUND")
}

pub fn validation_failed(violations: &[String]) -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::BAD_REQUEST)
        .type_("https://vulnguard.dev/probs/validation-failed")
        .title("Validation Failed")
        .detail(violations.join("; "))
        .value("violations", violations)
        .value("error_code", "VALIDATION_FAILED")
}

pub fn conflict(message: impl Into<String>) -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::CONFLICT)
        .type_("https://vulnguard.dev/probs/conflict")
        .title("Conflict")
        .detail(message)
        .value("error_code", "CONFLICT")
}

/// Map a `ServiceError` onto the RFC 7807 response it should produce.
///
/// Integrity violations are deliberately surfaced as 500s: they indicate
/// corrupted data upstream, not a client mistake.
pub fn from_service_error(err: &ServiceError) -> problemdetails::Problem {
    match err {
        ServiceError::NotFound { resource } => not_found(resource.clone()).build(),
        ServiceError::Validation { violations } => validation_failed(violations).build(),
        ServiceError::Conflict { message } => conflict(message.clone()).build(),
        ServiceError::Integrity { message } => internal_server_error()
            .type_("https://vulnguard.dev/probs/integrity-violation")
            .title("Data Integrity Violation")
            .detail(message.clone())
            .build(),
        ServiceError::Database(message) => internal_server_error()
            .detail(format!("Database error: {}", message))
            .build(),
        ServiceError::Internal(e) => internal_server_error().detail(e.to_string()).build(),
    }
}
