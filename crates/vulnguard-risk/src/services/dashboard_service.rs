use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use vulnguard_database::DbConnection;
use vulnguard_entities::types::Severity;
use vulnguard_entities::{assets, vulnerabilities};

use super::types::{Dashboard, FilteredDashboard, RiskError, ScoredFinding};
use crate::scoring;

const TOP_RISKS_LIMIT: usize = 10;

/// Aggregates open findings into the attack-surface dashboard.
///
/// Scores are recomputed in memory from the current asset criticality
/// on every call; cached `risk_score` values in the table are not
/// written back.
#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DbConnection>,
}

impl DashboardService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    pub async fn get_dashboard(&self) -> Result<Dashboard, RiskError> {
        let total_assets = assets::Entity::find().count(self.db.as_ref()).await?;
        let active_assets = assets::Entity::find()
            .filter(assets::Column::Active.eq(true))
            .count(self.db.as_ref())
            .await?;

        let pairs = self.open_findings_with_assets().await?;
        let open_vulnerabilities = pairs.len() as u64;

        let mut severity_breakdown: BTreeMap<String, u64> = Severity::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (finding, _) in &pairs {
            *severity_breakdown
                .entry(finding.severity.as_str().to_string())
                .or_insert(0) += 1;
        }

        let asset_names: HashMap<i32, String> = pairs
            .iter()
            .map(|(_, asset)| (asset.id, asset.name.clone()))
            .collect();

        let scored = scoring::score_and_sort(
            pairs
                .into_iter()
                .map(|(finding, asset)| (finding, asset.criticality))
                .collect(),
        );

        let average_risk_score = if scored.is_empty() {
            0.0
        } else {
            scoring::round2(
                scored.iter().map(|f| f.risk_score).sum::<f64>() / scored.len() as f64,
            )
        };

        let top_risks = scored
            .iter()
            .take(TOP_RISKS_LIMIT)
            .map(|f| {
                ScoredFinding::from_model(
                    f,
                    asset_names.get(&f.asset_id).map(String::as_str).unwrap_or(""),
                )
            })
            .collect();

        debug!(open = open_vulnerabilities, "built dashboard");

        Ok(Dashboard {
            total_assets,
            active_assets,
            open_vulnerabilities,
            severity_breakdown,
            top_risks,
            average_risk_score,
        })
    }

    pub async fn get_filtered_dashboard(
        &self,
        severity: Severity,
    ) -> Result<FilteredDashboard, RiskError> {
        let pairs: Vec<(vulnerabilities::Model, assets::Model)> = self
            .open_findings_with_assets()
            .await?
            .into_iter()
            .filter(|(finding, _)| finding.severity == severity)
            .collect();

        let asset_names: HashMap<i32, String> = pairs
            .iter()
            .map(|(_, asset)| (asset.id, asset.name.clone()))
            .collect();

        let scored = scoring::score_and_sort(
            pairs
                .into_iter()
                .map(|(finding, asset)| (finding, asset.criticality))
                .collect(),
        );

        Ok(FilteredDashboard {
            severity,
            count: scored.len() as u64,
            vulnerabilities: scored
                .iter()
                .map(|f| {
                    ScoredFinding::from_model(
                        f,
                        asset_names.get(&f.asset_id).map(String::as_str).unwrap_or(""),
                    )
                })
                .collect(),
        })
    }

    /// Open findings joined with their owning assets. A finding whose
    /// asset row is missing is an integrity error.
    async fn open_findings_with_assets(
        &self,
    ) -> Result<Vec<(vulnerabilities::Model, assets::Model)>, RiskError> {
        let rows = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::Remediated.eq(false))
            .find_also_related(assets::Entity)
            .order_by_asc(vulnerabilities::Column::Id)
            .all(self.db.as_ref())
            .await?;

        rows.into_iter()
            .map(|(finding, asset)| {
                let asset = asset.ok_or_else(|| {
                    RiskError::Integrity(format!(
                        "finding {} references missing asset {}",
                        finding.id, finding.asset_id
                    ))
                })?;
                Ok((finding, asset))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};
    use vulnguard_database::test_utils::setup_test_db;

    async fn insert_asset(
        db: &DbConnection,
        name: &str,
        criticality: i32,
        active: bool,
    ) -> assets::Model {
        assets::ActiveModel {
            name: Set(name.to_string()),
            asset_type: Set(vulnguard_entities::types::AssetType::WebApplication),
            address: Set(format!("{}.example.com", name.to_lowercase().replace(' ', "-"))),
            description: Set(None),
            criticality: Set(criticality),
            active: Set(active),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn insert_finding(
        db: &DbConnection,
        asset_id: i32,
        severity: Severity,
        age_in_days: i32,
        remediated: bool,
    ) -> vulnerabilities::Model {
        vulnerabilities::ActiveModel {
            cve_id: Set(format!("CVE-2026-{}{}", asset_id, age_in_days)),
            title: Set("Outdated TLS Cipher Suite".to_string()),
            severity: Set(severity),
            cvss_score: Set(5.0),
            discovered_at: Set(Utc::now()),
            age_in_days: Set(age_in_days),
            remediated: Set(remediated),
            risk_score: Set(0.0),
            asset_id: Set(asset_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let db = setup_test_db().await;
        let service = DashboardService::new(db);

        let dashboard = service.get_dashboard().await.unwrap();
        assert_eq!(dashboard.total_assets, 0);
        assert_eq!(dashboard.active_assets, 0);
        assert_eq!(dashboard.open_vulnerabilities, 0);
        assert_eq!(dashboard.average_risk_score, 0.0);
        assert!(dashboard.top_risks.is_empty());
        // Every severity key is present even with no findings
        assert_eq!(dashboard.severity_breakdown.len(), 5);
        assert!(dashboard.severity_breakdown.values().all(|&c| c == 0));
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_breakdown() {
        let db = setup_test_db().await;
        let service = DashboardService::new(db.clone());

        let portal = insert_asset(&db, "Portal", 4, true).await;
        let legacy = insert_asset(&db, "Legacy", 2, false).await;

        insert_finding(&db, portal.id, Severity::High, 30, false).await;
        insert_finding(&db, portal.id, Severity::High, 0, false).await;
        insert_finding(&db, legacy.id, Severity::Low, 10, false).await;
        // Remediated findings never count
        insert_finding(&db, portal.id, Severity::Critical, 5, true).await;

        let dashboard = service.get_dashboard().await.unwrap();
        assert_eq!(dashboard.total_assets, 2);
        assert_eq!(dashboard.active_assets, 1);
        assert_eq!(dashboard.open_vulnerabilities, 3);
        assert_eq!(dashboard.severity_breakdown["HIGH"], 2);
        assert_eq!(dashboard.severity_breakdown["LOW"], 1);
        assert_eq!(dashboard.severity_breakdown["CRITICAL"], 0);
    }

    #[tokio::test]
    async fn test_top_risks_sorted_and_scored() {
        let db = setup_test_db().await;
        let service = DashboardService::new(db.clone());

        let portal = insert_asset(&db, "Portal", 4, true).await;

        // HIGH, criticality 4, age 30 scores exactly 56.00
        insert_finding(&db, portal.id, Severity::High, 30, false).await;
        insert_finding(&db, portal.id, Severity::Low, 0, false).await;

        let dashboard = service.get_dashboard().await.unwrap();
        assert_eq!(dashboard.top_risks.len(), 2);
        assert_eq!(dashboard.top_risks[0].risk_score, 56.0);
        assert_eq!(dashboard.top_risks[0].asset_name, "Portal");
        assert!(dashboard.top_risks[0].risk_score >= dashboard.top_risks[1].risk_score);
    }

    #[tokio::test]
    async fn test_top_risks_capped_at_ten() {
        let db = setup_test_db().await;
        let service = DashboardService::new(db.clone());

        let portal = insert_asset(&db, "Portal", 3, true).await;
        for age in 0..12 {
            insert_finding(&db, portal.id, Severity::Medium, age, false).await;
        }

        let dashboard = service.get_dashboard().await.unwrap();
        assert_eq!(dashboard.open_vulnerabilities, 12);
        assert_eq!(dashboard.top_risks.len(), 10);
    }

    #[tokio::test]
    async fn test_filtered_dashboard() {
        let db = setup_test_db().await;
        let service = DashboardService::new(db.clone());

        let portal = insert_asset(&db, "Portal", 5, true).await;
        insert_finding(&db, portal.id, Severity::Critical, 0, false).await;
        insert_finding(&db, portal.id, Severity::Critical, 60, false).await;
        insert_finding(&db, portal.id, Severity::Low, 0, false).await;

        let filtered = service
            .get_filtered_dashboard(Severity::Critical)
            .await
            .unwrap();
        assert_eq!(filtered.count, 2);
        assert_eq!(filtered.vulnerabilities.len(), 2);
        // Older finding scores higher, so it leads
        assert_eq!(filtered.vulnerabilities[0].age_in_days, 60);
        assert!(filtered
            .vulnerabilities
            .iter()
            .all(|v| v.severity == Severity::Critical));
    }
}
