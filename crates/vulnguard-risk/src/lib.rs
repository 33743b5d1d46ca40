//! Risk scoring and attack-surface aggregation.
//!
//! The scoring function is pure; the dashboard service joins open
//! findings with their owning assets and aggregates in memory without
//! writing recomputed scores back.

pub mod handlers;
pub mod scoring;
pub mod services;

pub use services::{DashboardService, RiskError};

mod plugin;
pub use plugin::DashboardPlugin;
