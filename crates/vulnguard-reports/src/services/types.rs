use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use vulnguard_entities::types::Severity;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Data integrity error: {0}")]
    Integrity(String),
}

/// One finding as it appears in a report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportFinding {
    #[schema(example = "CVE-2026-4821")]
    pub cve_id: String,
    #[schema(example = "SQL Injection")]
    pub title: String,
    pub severity: Severity,
    pub cvss_score: f64,
    pub age_in_days: i32,
    pub risk_score: f64,
    #[schema(example = "Customer Portal")]
    pub asset_name: String,
}

/// Per-asset section of the report; remediated findings are excluded
#[derive(Debug, Serialize, ToSchema)]
pub struct AssetReport {
    pub asset_name: String,
    pub asset_type: String,
    pub address: String,
    pub criticality: i32,
    /// Formatted timestamp of the last scan, or "Never"
    #[schema(example = "2026-03-15 12:00")]
    pub last_scanned: String,
    pub open_findings: Vec<ReportFinding>,
}

/// The full attack-surface report. This exact structure backs both the
/// JSON endpoint and the PDF export.
#[derive(Debug, Serialize, ToSchema)]
pub struct Report {
    #[schema(example = "VulnGuard Attack Surface Report")]
    pub report_title: String,
    #[schema(example = "2026-03-15 12:00")]
    pub generated_at: String,
    pub total_assets: u64,
    pub open_vulnerabilities: u64,
    pub severity_distribution: BTreeMap<String, u64>,
    pub assets: Vec<AssetReport>,
    /// Ten highest-scoring open findings across all assets
    pub top_risks: Vec<ReportFinding>,
}
