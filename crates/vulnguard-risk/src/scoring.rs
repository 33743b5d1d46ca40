//! Pure risk-scoring functions.
//!
//! `risk = severity_weight * asset_criticality * (1 + age_in_days / 30)`
//! rounded to two decimal places.

use std::cmp::Ordering;

use vulnguard_entities::types::Severity;
use vulnguard_entities::vulnerabilities;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Risk score for a single finding given the owning asset's criticality.
pub fn calculate_score(severity: Severity, criticality: i32, age_in_days: i32) -> f64 {
    let raw = severity.weight() * criticality as f64 * (1.0 + age_in_days as f64 / 30.0);
    round2(raw)
}

/// Recompute scores for a batch of findings and sort them by score,
/// highest first. Ties keep their input order.
///
/// Each pair is a finding and the criticality of the asset that owns
/// it. The returned models carry the freshly computed `risk_score`;
/// nothing is persisted here.
pub fn score_and_sort(
    findings: Vec<(vulnerabilities::Model, i32)>,
) -> Vec<vulnerabilities::Model> {
    let mut scored: Vec<vulnerabilities::Model> = findings
        .into_iter()
        .map(|(mut finding, criticality)| {
            finding.risk_score =
                calculate_score(finding.severity, criticality, finding.age_in_days);
            finding
        })
        .collect();

    // Scores are never NaN, so Equal on incomparable is unreachable
    scored.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
    });
    scored
}

/// Rescore, sort, and keep findings scoring at or above `min_score`.
///
/// Takes the same pairs as [`score_and_sort`] and recomputes every
/// score before comparing. Filtering the persisted `risk_score` would
/// act on whatever the last scan wrote, which may be stale.
pub fn filter_by_min_score(
    findings: Vec<(vulnerabilities::Model, i32)>,
    min_score: f64,
) -> Vec<vulnerabilities::Model> {
    score_and_sort(findings)
        .into_iter()
        .filter(|f| f.risk_score >= min_score)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn finding(id: i32, severity: Severity, age_in_days: i32) -> vulnerabilities::Model {
        vulnerabilities::Model {
            id,
            cve_id: format!("CVE-2026-{:04}", id),
            title: "SQL Injection".to_string(),
            severity,
            cvss_score: 8.0,
            discovered_at: Utc::now(),
            age_in_days,
            remediated: false,
            risk_score: 0.0,
            asset_id: 1,
        }
    }

    #[test]
    fn test_worked_example() {
        // HIGH (7.0) on criticality 4 at age 30: 7.0 * 4 * 2.0 = 56.00
        assert_eq!(calculate_score(Severity::High, 4, 30), 56.0);
    }

    #[test]
    fn test_zero_age_multiplier_is_one() {
        assert_eq!(calculate_score(Severity::Critical, 5, 0), 50.0);
        assert_eq!(calculate_score(Severity::Info, 1, 0), 0.5);
    }

    #[test]
    fn test_round2_half_up() {
        // 0.125 is exact in binary, so the half-away rounding is visible
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(56.789), 56.79);
        assert_eq!(round2(2.674999), 2.67);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let once = calculate_score(Severity::Medium, 3, 45);
        let twice = round2(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_score_and_sort_descending() {
        let input = vec![
            (finding(1, Severity::Low, 10), 2),
            (finding(2, Severity::Critical, 60), 5),
            (finding(3, Severity::Medium, 0), 3),
        ];
        let sorted = score_and_sort(input);
        let scores: Vec<f64> = sorted.iter().map(|f| f.risk_score).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(sorted[0].id, 2);
    }

    #[test]
    fn test_score_and_sort_ties_keep_input_order() {
        let input = vec![
            (finding(7, Severity::High, 30), 2),
            (finding(8, Severity::High, 30), 2),
            (finding(9, Severity::High, 30), 2),
        ];
        let sorted = score_and_sort(input);
        let ids: Vec<i32> = sorted.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_filter_by_min_score_is_inclusive() {
        let kept = filter_by_min_score(
            vec![
                (finding(1, Severity::High, 30), 4), // 56.00
                (finding(2, Severity::Low, 0), 1),   // 1.00
            ],
            56.0,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }

    #[test]
    fn test_filter_by_min_score_ignores_stale_cached_score() {
        // Cached risk_score is 0.0 from the helper; the true score for
        // HIGH on criticality 4 at age 30 is 56.00 and must be what the
        // threshold compares against.
        let kept = filter_by_min_score(vec![(finding(1, Severity::High, 30), 4)], 10.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].risk_score, 56.0);
    }

    #[test]
    fn test_filter_by_min_score_returns_sorted() {
        let kept = filter_by_min_score(
            vec![
                (finding(1, Severity::Low, 0), 2),       // 2.00
                (finding(2, Severity::Critical, 30), 5), // 100.00
                (finding(3, Severity::High, 30), 4),     // 56.00
            ],
            2.0,
        );
        let ids: Vec<i32> = kept.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
