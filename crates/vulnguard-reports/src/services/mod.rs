mod report_service;
mod types;

pub use report_service::ReportService;
pub use types::{AssetReport, Report, ReportError, ReportFinding};
