//! End-to-end flow: scan an asset, then observe the findings through
//! the open list and the dashboard ranking.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, Set};

use vulnguard_core::{Clock, FixedClock, RandomSource};
use vulnguard_database::test_utils::setup_test_db;
use vulnguard_entities::assets;
use vulnguard_entities::types::{AssetType, Severity};
use vulnguard_risk::services::DashboardService;
use vulnguard_scans::{ScanSimulator, VulnerabilityService};

/// Random source replaying a fixed script of draws, so the scan content
/// is fully controlled by the test.
struct ScriptedRandom {
    ints: Mutex<VecDeque<u32>>,
    floats: Mutex<VecDeque<f64>>,
}

impl ScriptedRandom {
    fn new(ints: Vec<u32>, floats: Vec<f64>) -> Self {
        Self {
            ints: Mutex::new(ints.into()),
            floats: Mutex::new(floats.into()),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn int_in_range(&self, min: u32, max: u32) -> u32 {
        let v = self
            .ints
            .lock()
            .unwrap()
            .pop_front()
            .expect("script ran out of ints");
        assert!((min..=max).contains(&v), "scripted {} outside [{}, {}]", v, min, max);
        v
    }

    fn float_in_range(&self, min: f64, max: f64) -> f64 {
        let v = self
            .floats
            .lock()
            .unwrap()
            .pop_front()
            .expect("script ran out of floats");
        assert!(v >= min && v < max);
        v
    }
}

#[tokio::test]
async fn test_critical_finding_on_crown_jewel_ranks_first() {
    let db = setup_test_db().await;

    let asset = assets::ActiveModel {
        name: Set("Payments API".to_string()),
        asset_type: Set(AssetType::ApiEndpoint),
        address: Set("payments.example.com".to_string()),
        description: Set(None),
        criticality: Set(5),
        active: Set(true),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .unwrap();

    // Draw order per scan: finding count, then per finding
    // severity index, title index, cve number, cvss, age.
    let random = ScriptedRandom::new(
        vec![
            3, // three findings
            0, 0, 4821, 0, // CRITICAL, first title, CVE number, age 0
            4, 1, 1111, 0, // INFO
            4, 2, 2222, 0, // INFO
        ],
        vec![9.4, 0.2, 0.3],
    );
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap());

    let simulator = ScanSimulator::new(
        db.clone(),
        Arc::new(clock) as Arc<dyn Clock>,
        Arc::new(random) as Arc<dyn RandomSource>,
    );

    let findings = simulator.scan_asset(asset.id).await.unwrap();
    assert_eq!(findings.len(), 3);

    let critical = findings
        .iter()
        .find(|f| f.severity == Severity::Critical)
        .expect("scripted critical finding");
    assert_eq!(critical.cve_id, "CVE-2026-4821");
    assert_eq!(critical.age_in_days, 0);
    // 10.0 weight x criticality 5 x age factor 1.0
    assert_eq!(critical.risk_score, 50.0);

    // Visible in the open list, ranked first
    let vulnerabilities = VulnerabilityService::new(db.clone());
    let open = vulnerabilities.get_all_open().await.unwrap();
    assert_eq!(open.len(), 3);
    assert_eq!(open[0].id, critical.id);
    assert_eq!(open[0].risk_score, 50.0);

    // And in the dashboard top risks
    let dashboard = DashboardService::new(db).get_dashboard().await.unwrap();
    assert_eq!(dashboard.open_vulnerabilities, 3);
    assert_eq!(dashboard.top_risks[0].cve_id, "CVE-2026-4821");
    assert_eq!(dashboard.top_risks[0].risk_score, 50.0);
    assert_eq!(dashboard.severity_breakdown["CRITICAL"], 1);
    assert_eq!(dashboard.severity_breakdown["INFO"], 2);
}
