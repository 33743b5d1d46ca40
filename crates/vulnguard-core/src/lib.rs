//! Core utilities and types shared across all VulnGuard crates

pub mod clock;
pub mod error;
pub mod error_builder;
pub mod plugin;
pub mod problemdetails;
pub mod random;
pub mod types;

pub use problemdetails::ProblemDetails;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::*;
pub use error_builder::*;
pub use random::{RandomSource, SeededRandom};
pub use types::*;

// Re-export external dependencies
pub use anyhow;
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;
