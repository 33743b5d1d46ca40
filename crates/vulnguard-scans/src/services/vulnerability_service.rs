use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{debug, info};

use vulnguard_database::DbConnection;
use vulnguard_entities::types::Severity;
use vulnguard_entities::{assets, vulnerabilities};
use vulnguard_risk::scoring;

use super::types::ScanError;

/// Query and mutation surface over findings. The only mutation is the
/// one-way open → remediated transition.
#[derive(Clone)]
pub struct VulnerabilityService {
    db: Arc<DbConnection>,
}

impl VulnerabilityService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<vulnerabilities::Model, ScanError> {
        vulnerabilities::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ScanError::FindingNotFound(id))
    }

    /// Every finding on the asset, open and remediated alike.
    pub async fn get_by_asset(
        &self,
        asset_id: i32,
    ) -> Result<Vec<vulnerabilities::Model>, ScanError> {
        assets::Entity::find_by_id(asset_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ScanError::AssetNotFound(asset_id))?;

        Ok(vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::AssetId.eq(asset_id))
            .order_by_asc(vulnerabilities::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// All open findings across assets, rescored and sorted by risk,
    /// highest first.
    pub async fn get_all_open(&self) -> Result<Vec<vulnerabilities::Model>, ScanError> {
        let rows = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::Remediated.eq(false))
            .find_also_related(assets::Entity)
            .order_by_asc(vulnerabilities::Column::Id)
            .all(self.db.as_ref())
            .await?;

        let pairs = rows
            .into_iter()
            .map(|(finding, asset)| {
                let asset = asset.ok_or_else(|| {
                    ScanError::Integrity(format!(
                        "finding {} references missing asset {}",
                        finding.id, finding.asset_id
                    ))
                })?;
                Ok((finding, asset.criticality))
            })
            .collect::<Result<Vec<_>, ScanError>>()?;

        Ok(scoring::score_and_sort(pairs))
    }

    /// Findings of one severity regardless of remediation state.
    pub async fn get_by_severity(
        &self,
        severity: Severity,
    ) -> Result<Vec<vulnerabilities::Model>, ScanError> {
        Ok(vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::Severity.eq(severity))
            .order_by_asc(vulnerabilities::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Flip a finding to remediated. Idempotent: remediating an
    /// already-remediated finding returns it unchanged.
    pub async fn mark_remediated(&self, id: i32) -> Result<vulnerabilities::Model, ScanError> {
        let finding = self.get_by_id(id).await?;

        if finding.remediated {
            debug!(finding_id = id, "finding already remediated");
            return Ok(finding);
        }

        let mut model: vulnerabilities::ActiveModel = finding.into();
        model.remediated = Set(true);
        let updated = model.update(self.db.as_ref()).await?;

        info!(finding_id = id, cve_id = %updated.cve_id, "finding remediated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vulnguard_database::test_utils::setup_test_db;
    use vulnguard_entities::types::AssetType;

    async fn insert_asset(db: &DbConnection, criticality: i32) -> assets::Model {
        assets::ActiveModel {
            name: Set("Customer Portal".to_string()),
            asset_type: Set(AssetType::WebApplication),
            address: Set("portal.example.com".to_string()),
            description: Set(None),
            criticality: Set(criticality),
            active: Set(true),
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
            cve_id: Set(format!("CVE-2026-{:04}", asset_id * 100 + age_in_days)),
            title: Set("Directory Traversal".to_string()),
            severity: Set(severity),
            cvss_score: Set(6.5),
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
    async fn test_get_by_asset_includes_remediated() {
        let db = setup_test_db().await;
        let service = VulnerabilityService::new(db.clone());
        let asset = insert_asset(&db, 3).await;

        insert_finding(&db, asset.id, Severity::Medium, 5, false).await;
        insert_finding(&db, asset.id, Severity::Medium, 6, true).await;

        let findings = service.get_by_asset(asset.id).await.unwrap();
        assert_eq!(findings.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_asset_missing_asset() {
        let db = setup_test_db().await;
        let service = VulnerabilityService::new(db);

        let err = service.get_by_asset(321).await.unwrap_err();
        assert!(matches!(err, ScanError::AssetNotFound(321)));
    }

    #[tokio::test]
    async fn test_get_all_open_sorted_by_score() {
        let db = setup_test_db().await;
        let service = VulnerabilityService::new(db.clone());
        let low_value = insert_asset(&db, 1).await;
        let crown_jewel = insert_asset(&db, 5).await;

        insert_finding(&db, low_value.id, Severity::High, 0, false).await;
        insert_finding(&db, crown_jewel.id, Severity::High, 0, false).await;
        insert_finding(&db, crown_jewel.id, Severity::Info, 0, true).await;

        let open = service.get_all_open().await.unwrap();
        assert_eq!(open.len(), 2);
        // Criticality 5 asset outranks criticality 1 for the same finding
        assert_eq!(open[0].asset_id, crown_jewel.id);
        assert_eq!(open[0].risk_score, 35.0);
        assert_eq!(open[1].risk_score, 7.0);
    }

    #[tokio::test]
    async fn test_get_by_severity_ignores_remediation_state() {
        let db = setup_test_db().await;
        let service = VulnerabilityService::new(db.clone());
        let asset = insert_asset(&db, 2).await;

        insert_finding(&db, asset.id, Severity::Critical, 1, false).await;
        insert_finding(&db, asset.id, Severity::Critical, 2, true).await;
        insert_finding(&db, asset.id, Severity::Low, 3, false).await;

        let criticals = service.get_by_severity(Severity::Critical).await.unwrap();
        assert_eq!(criticals.len(), 2);
    }

    #[tokio::test]
    async fn test_mark_remediated_is_idempotent() {
        let db = setup_test_db().await;
        let service = VulnerabilityService::new(db.clone());
        let asset = insert_asset(&db, 3).await;
        let finding = insert_finding(&db, asset.id, Severity::High, 10, false).await;

        let first = service.mark_remediated(finding.id).await.unwrap();
        assert!(first.remediated);

        let second = service.mark_remediated(finding.id).await.unwrap();
        assert!(second.remediated);
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_mark_remediated_missing_finding() {
        let db = setup_test_db().await;
        let service = VulnerabilityService::new(db);

        let err = service.mark_remediated(777).await.unwrap_err();
        assert!(matches!(err, ScanError::FindingNotFound(777)));
    }
}
