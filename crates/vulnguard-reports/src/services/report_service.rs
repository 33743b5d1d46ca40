use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use vulnguard_core::Clock;
use vulnguard_database::DbConnection;
use vulnguard_entities::types::Severity;
use vulnguard_entities::{assets, vulnerabilities};
use vulnguard_risk::scoring;

use super::types::{AssetReport, Report, ReportError, ReportFinding};

const REPORT_TITLE: &str = "VulnGuard Attack Surface Report";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const TOP_RISKS_LIMIT: usize = 10;

/// Assembles the attack-surface report. Pure assembly: scoring and
/// ranking are delegated to the scoring module, rendering to the
/// `DocumentRenderer`.
pub struct ReportService {
    db: Arc<DbConnection>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(db: Arc<DbConnection>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn build_report(&self) -> Result<Report, ReportError> {
        let all_assets = assets::Entity::find()
            .order_by_asc(assets::Column::Id)
            .all(self.db.as_ref())
            .await?;

        let asset_index: HashMap<i32, &assets::Model> =
            all_assets.iter().map(|a| (a.id, a)).collect();

        let open = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::Remediated.eq(false))
            .order_by_asc(vulnerabilities::Column::Id)
            .all(self.db.as_ref())
            .await?;

        let mut severity_distribution: BTreeMap<String, u64> = Severity::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for finding in &open {
            *severity_distribution
                .entry(finding.severity.as_str().to_string())
                .or_insert(0) += 1;
        }

        let pairs = open
            .into_iter()
            .map(|finding| {
                let criticality = asset_index
                    .get(&finding.asset_id)
                    .map(|a| a.criticality)
                    .ok_or_else(|| {
                        ReportError::Integrity(format!(
                            "finding {} references missing asset {}",
                            finding.id, finding.asset_id
                        ))
                    })?;
                Ok((finding, criticality))
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        let scored = scoring::score_and_sort(pairs);
        let open_vulnerabilities = scored.len() as u64;

        let to_finding = |model: &vulnerabilities::Model| -> ReportFinding {
            ReportFinding {
                cve_id: model.cve_id.clone(),
                title: model.title.clone(),
                severity: model.severity,
                cvss_score: model.cvss_score,
                age_in_days: model.age_in_days,
                risk_score: model.risk_score,
                asset_name: asset_index
                    .get(&model.asset_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
            }
        };

        let top_risks: Vec<ReportFinding> = scored
            .iter()
            .take(TOP_RISKS_LIMIT)
            .map(|f| to_finding(f))
            .collect();

        let asset_sections = all_assets
            .iter()
            .map(|asset| AssetReport {
                asset_name: asset.name.clone(),
                asset_type: asset.asset_type.as_str().to_string(),
                address: asset.address.clone(),
                criticality: asset.criticality,
                last_scanned: asset
                    .last_scanned_at
                    .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_else(|| "Never".to_string()),
                open_findings: scored
                    .iter()
                    .filter(|f| f.asset_id == asset.id)
                    .map(|f| to_finding(f))
                    .collect(),
            })
            .collect();

        debug!(open = open_vulnerabilities, "assembled report");

        Ok(Report {
            report_title: REPORT_TITLE.to_string(),
            generated_at: self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
            total_assets: all_assets.len() as u64,
            open_vulnerabilities,
            severity_distribution,
            assets: asset_sections,
            top_risks,
        })
    }
}
