use chrono::{Datelike, Duration};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use std::sync::Arc;
use tracing::info;

use vulnguard_core::{Clock, RandomSource};
use vulnguard_database::DbConnection;
use vulnguard_entities::types::Severity;
use vulnguard_entities::{assets, vulnerabilities};
use vulnguard_risk::scoring;

use super::types::ScanError;

/// Titles drawn per finding. Closed catalog, indexable by the random
/// source.
const ARCHETYPES: &[&str] = &[
    "SQL Injection",
    "Cross-Site Scripting",
    "Exposed Admin Panel",
    "Outdated TLS Cipher Suite",
    "Default Credentials",
    "Directory Traversal",
    "Insecure Deserialization",
    "Missing Security Headers",
];

const MIN_FINDINGS: u32 = 3;
const MAX_FINDINGS: u32 = 5;
const MAX_AGE_DAYS: u32 = 180;

/// Synthesizes vulnerability findings for an asset.
///
/// Severity is drawn uniformly across the five levels. With a seeded
/// random source and a fixed clock, a scan produces the same findings
/// every time.
pub struct ScanSimulator {
    db: Arc<DbConnection>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl ScanSimulator {
    pub fn new(db: Arc<DbConnection>, clock: Arc<dyn Clock>, random: Arc<dyn RandomSource>) -> Self {
        Self { db, clock, random }
    }

    /// Generate 3-5 findings for the asset, persist them, and stamp the
    /// asset's `last_scanned_at`.
    ///
    /// A missing asset fails with `AssetNotFound`; an inactive asset is
    /// rejected as a validation failure since it exists but is not
    /// scannable.
    pub async fn scan_asset(&self, asset_id: i32) -> Result<Vec<vulnerabilities::Model>, ScanError> {
        let asset = assets::Entity::find_by_id(asset_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ScanError::AssetNotFound(asset_id))?;

        if !asset.active {
            return Err(ScanError::Validation(vec![format!(
                "asset {} is inactive and cannot be scanned",
                asset_id
            )]));
        }

        let now = self.clock.now();
        let count = self.random.int_in_range(MIN_FINDINGS, MAX_FINDINGS);

        let mut findings = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let severity = Severity::ALL
                [self.random.int_in_range(0, Severity::ALL.len() as u32 - 1) as usize];
            let title =
                ARCHETYPES[self.random.int_in_range(0, ARCHETYPES.len() as u32 - 1) as usize];
            let cve_id = format!(
                "CVE-{}-{:04}",
                now.year(),
                self.random.int_in_range(1000, 9999)
            );
            let (low, high) = cvss_band(severity);
            let cvss_score = round1(self.random.float_in_range(low, high));
            let age_in_days = self.random.int_in_range(0, MAX_AGE_DAYS) as i32;

            let risk_score = scoring::calculate_score(severity, asset.criticality, age_in_days);

            let finding = vulnerabilities::ActiveModel {
                cve_id: Set(cve_id),
                title: Set(title.to_string()),
                severity: Set(severity),
                cvss_score: Set(cvss_score),
                discovered_at: Set(now - Duration::days(age_in_days as i64)),
                age_in_days: Set(age_in_days),
                remediated: Set(false),
                risk_score: Set(risk_score),
                asset_id: Set(asset.id),
                ..Default::default()
            }
            .insert(self.db.as_ref())
            .await?;

            findings.push(finding);
        }

        let mut asset_model: assets::ActiveModel = asset.into();
        asset_model.last_scanned_at = Set(Some(now));
        asset_model.update(self.db.as_ref()).await?;

        info!(
            asset_id,
            findings = findings.len(),
            "scan completed"
        );
        Ok(findings)
    }
}

/// CVSS range for each severity. The random draw is `[low, high)`, so
/// after rounding to one decimal the score stays inside the band.
fn cvss_band(severity: Severity) -> (f64, f64) {
    match severity {
        Severity::Critical => (9.0, 10.0),
        Severity::High => (7.0, 8.9),
        Severity::Medium => (4.0, 6.9),
        Severity::Low => (1.0, 3.9),
        Severity::Info => (0.0, 0.9),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{ColumnTrait, QueryFilter};
    use vulnguard_core::{FixedClock, SeededRandom};
    use vulnguard_database::test_utils::setup_test_db;
    use vulnguard_entities::types::AssetType;

    async fn insert_asset(db: &DbConnection, criticality: i32, active: bool) -> assets::Model {
        assets::ActiveModel {
            name: Set("Customer Portal".to_string()),
            asset_type: Set(AssetType::WebApplication),
            address: Set("portal.example.com".to_string()),
            description: Set(None),
            criticality: Set(criticality),
            active: Set(active),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    fn simulator(db: Arc<DbConnection>, seed: u64) -> ScanSimulator {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap());
        ScanSimulator::new(
            db,
            Arc::new(clock),
            Arc::new(SeededRandom::from_seed(seed)),
        )
    }

    #[tokio::test]
    async fn test_scan_produces_three_to_five_findings() {
        let db = setup_test_db().await;
        let asset = insert_asset(&db, 3, true).await;
        let sim = simulator(db.clone(), 42);

        let findings = sim.scan_asset(asset.id).await.unwrap();
        assert!((3..=5).contains(&findings.len()));
        assert!(findings.iter().all(|f| f.asset_id == asset.id));
        assert!(findings.iter().all(|f| !f.remediated));

        let updated = assets::Entity::find_by_id(asset.id)
            .one(db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert!(updated.last_scanned_at.is_some());
    }

    #[tokio::test]
    async fn test_scan_is_deterministic_under_seed() {
        let db_a = setup_test_db().await;
        let db_b = setup_test_db().await;
        let asset_a = insert_asset(&db_a, 4, true).await;
        let asset_b = insert_asset(&db_b, 4, true).await;

        let findings_a = simulator(db_a, 7).scan_asset(asset_a.id).await.unwrap();
        let findings_b = simulator(db_b, 7).scan_asset(asset_b.id).await.unwrap();

        assert_eq!(findings_a.len(), findings_b.len());
        for (a, b) in findings_a.iter().zip(&findings_b) {
            assert_eq!(a.cve_id, b.cve_id);
            assert_eq!(a.title, b.title);
            assert_eq!(a.severity, b.severity);
            assert_eq!(a.cvss_score, b.cvss_score);
            assert_eq!(a.age_in_days, b.age_in_days);
        }
    }

    #[tokio::test]
    async fn test_cvss_stays_inside_severity_band() {
        let db = setup_test_db().await;
        let asset = insert_asset(&db, 5, true).await;

        // Several seeds to cover a spread of draws
        for seed in 0..20u64 {
            simulator(db.clone(), seed).scan_asset(asset.id).await.unwrap();
        }

        let findings = vulnerabilities::Entity::find()
            .filter(vulnerabilities::Column::AssetId.eq(asset.id))
            .all(db.as_ref())
            .await
            .unwrap();
        for f in findings {
            let (low, high) = cvss_band(f.severity);
            assert!(
                f.cvss_score >= low && f.cvss_score <= high,
                "{:?} score {} outside [{}, {}]",
                f.severity,
                f.cvss_score,
                low,
                high
            );
            assert!((0..=180).contains(&f.age_in_days));
        }
    }

    #[tokio::test]
    async fn test_scan_missing_asset_is_not_found() {
        let db = setup_test_db().await;
        let sim = simulator(db, 1);

        let err = sim.scan_asset(404).await.unwrap_err();
        assert!(matches!(err, ScanError::AssetNotFound(404)));
    }

    #[tokio::test]
    async fn test_scan_inactive_asset_is_rejected() {
        let db = setup_test_db().await;
        let asset = insert_asset(&db, 3, false).await;
        let sim = simulator(db, 1);

        let err = sim.scan_asset(asset.id).await.unwrap_err();
        assert!(matches!(err, ScanError::Validation(_)));
    }

    #[tokio::test]
    async fn test_initial_risk_score_matches_formula() {
        let db = setup_test_db().await;
        let asset = insert_asset(&db, 4, true).await;
        let sim = simulator(db, 99);

        let findings = sim.scan_asset(asset.id).await.unwrap();
        for f in findings {
            assert_eq!(
                f.risk_score,
                scoring::calculate_score(f.severity, 4, f.age_in_days)
            );
        }
    }
}
