mod scan_simulator;
mod types;
mod vulnerability_service;

pub use scan_simulator::ScanSimulator;
pub use types::ScanError;
pub use vulnerability_service::VulnerabilityService;
