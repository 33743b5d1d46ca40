use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use vulnguard_entities::types::Severity;
use vulnguard_entities::vulnerabilities;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Data integrity error: {0}")]
    Integrity(String),
}

/// An open finding with its freshly computed risk score and the asset
/// it was found on
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoredFinding {
    pub id: i32,
    #[schema(example = "CVE-2026-1234")]
    pub cve_id: String,
    #[schema(example = "SQL Injection")]
    pub title: String,
    pub severity: Severity,
    pub cvss_score: f64,
    pub age_in_days: i32,
    pub risk_score: f64,
    pub asset_id: i32,
    #[schema(example = "Customer Portal")]
    pub asset_name: String,
}

impl ScoredFinding {
    pub fn from_model(model: &vulnerabilities::Model, asset_name: &str) -> Self {
        Self {
            id: model.id,
            cve_id: model.cve_id.clone(),
            title: model.title.clone(),
            severity: model.severity,
            cvss_score: model.cvss_score,
            age_in_days: model.age_in_days,
            risk_score: model.risk_score,
            asset_id: model.asset_id,
            asset_name: asset_name.to_string(),
        }
    }
}

/// Aggregated view of the attack surface
#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub total_assets: u64,
    pub active_assets: u64,
    pub open_vulnerabilities: u64,
    /// Open finding counts keyed by severity name
    pub severity_breakdown: BTreeMap<String, u64>,
    /// Ten highest-scoring open findings
    pub top_risks: Vec<ScoredFinding>,
    /// Mean risk score across open findings, 0.0 when none are open
    pub average_risk_score: f64,
}

/// Dashboard slice restricted to a single severity
#[derive(Debug, Serialize, ToSchema)]
pub struct FilteredDashboard {
    pub severity: Severity,
    pub count: u64,
    /// Every open finding of the severity, highest score first
    pub vulnerabilities: Vec<ScoredFinding>,
}
