//! Scan simulation and vulnerability lifecycle.
//!
//! Findings are synthetic; no network scanning happens here. The
//! simulator takes an injected clock and random source so scans are
//! reproducible under a fixed seed.

pub mod handlers;
pub mod services;

pub use services::{ScanError, ScanSimulator, VulnerabilityService};

mod plugin;
pub use plugin::ScansPlugin;
