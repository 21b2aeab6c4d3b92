// ABOUTME: End-to-end tests for the performance engine and report assembly
// ABOUTME: Reference-time rebasing, per-metric failure isolation, zones, batches and JSON snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{as_of, assert_close, days_ago, effort, effort_with_hr, hybrid_effort};
use threshold_engine::config::{EngineConfig, ZonesConfig};
use threshold_engine::engine::{AthleteSnapshot, PerformanceEngine};
use threshold_engine::models::{AthleteContext, EffortCandidate};
use threshold_engine::report::{EstimatedMetrics, MetricReportAssembler, UnavailableMetric};

const CP_GRID: [f64; 11] = [
    60.0, 120.0, 180.0, 300.0, 420.0, 600.0, 900.0, 1200.0, 1800.0, 2400.0, 3600.0,
];

fn engine() -> PerformanceEngine {
    PerformanceEngine::new(EngineConfig::<false>::default().validate().unwrap())
}

fn snapshot() -> AthleteSnapshot {
    AthleteSnapshot {
        athlete_id: "athlete-1".to_owned(),
        context: AthleteContext {
            max_heart_rate: Some(190.0),
            weight_kg: Some(70.0),
        },
        vma: [0.0, 10.0, 20.0, 30.0, 40.0]
            .iter()
            .map(|age| effort_with_hr(&format!("run-{age}"), 18.0, 360.0, *age, 0.95))
            .collect(),
        ftp: vec![
            effort_with_hr("ride-1", 300.0, 1200.0, 3.0, 0.85),
            effort_with_hr("ride-2", 300.0, 1200.0, 12.0, 0.85),
        ],
        css: Vec::new(),
        ftp_hybrid: vec![hybrid_effort("hybrid-40", 40, 260.0, Some(0.92))],
        critical_power: CP_GRID
            .iter()
            .map(|t| effort(&format!("mmp-{t}"), 250.0 + 20_000.0 / t, *t, 2.0))
            .collect(),
        critical_speed: Vec::new(),
    }
}

#[test]
fn test_report_contains_every_available_metric() {
    common::init_test_logging();
    let report = engine().generate_report(&snapshot(), as_of());

    assert_eq!(report.athlete_id, "athlete-1");
    assert_eq!(report.as_of, as_of());
    assert_eq!(report.available_count(), 4);

    let vma = report.vma.as_ref().unwrap();
    assert_close(vma.value, 18.0, 1e-9);
    assert_eq!(vma.unit, "km/h");
    assert!(vma.confidence_percent > 80);

    let ftp = report.ftp.as_ref().unwrap();
    assert_close(ftp.value, 315.0, 1e-9);
    assert_close(ftp.per_kg.unwrap(), 4.5, 1e-9);

    let cp = report.critical_power.as_ref().unwrap();
    assert_close(cp.threshold_value, 250.0, 1e-6);
    assert_close(cp.reserve_value, 20.0, 1e-6);
    assert_close(cp.per_kg.unwrap(), 250.0 / 70.0, 1e-6);

    let hybrid = report.ftp_hybrid.as_ref().unwrap();
    assert_close(hybrid.per_kg.unwrap(), hybrid.value / 70.0, 1e-9);
    assert!(vma.per_kg.is_none());
}

#[test]
fn test_missing_metrics_are_listed_with_reasons() {
    let report = engine().generate_report(&snapshot(), as_of());

    let unavailable: Vec<&str> = report
        .unavailable
        .iter()
        .map(|u| u.metric.as_str())
        .collect();
    assert_eq!(unavailable, vec!["css", "cs_dprime"]);

    let css = &report.unavailable[0];
    assert!(css.reason.contains("best_efforts: insufficient efforts"));
    assert!(css.reason.contains("regression: minimum 3 points required"));
    assert_eq!(report.css_methods.len(), 3);
}

#[test]
fn test_ages_are_recomputed_from_session_dates() {
    let mut snapshot = snapshot();
    // stale ages from an earlier extraction must not leak into the report
    for effort in &mut snapshot.vma {
        effort.age_days = 999.0;
    }
    let report = engine().generate_report(&snapshot, as_of());
    assert!(report.vma.is_some());

    // a later reference time pushes every effort out of the 120 day lookback
    let later = engine().generate_report(&snapshot, as_of() + Duration::days(200));
    assert!(later.vma.is_none());
    assert!(later.unavailable.iter().any(|u| u.metric == "vma"));
}

#[test]
fn test_failing_metric_does_not_block_others() {
    let mut snapshot = snapshot();
    // an exact curve with a negative asymptote makes the CP fit fail
    snapshot.critical_power = [60.0, 120.0, 300.0]
        .iter()
        .map(|t| effort(&format!("bad-{t}"), -10.0 + 40_000.0 / t, *t, 1.0))
        .collect();

    let report = engine().generate_report(&snapshot, as_of());

    assert!(report.critical_power.is_none());
    assert!(report.vma.is_some());
    assert!(report.ftp.is_some());
    let cp = report
        .unavailable
        .iter()
        .find(|u| u.metric == "cp_wprime")
        .unwrap();
    assert!(cp.reason.contains("non-positive threshold"));
}

#[test]
fn test_zones_split_the_threshold() {
    let report = engine().generate_report(&snapshot(), as_of());
    let zones = &report.vma.as_ref().unwrap().zones;

    assert_eq!(zones.len(), 5);
    assert_eq!(zones[0].zone, "Z1");
    assert_close(zones[0].lower, 0.0, f64::EPSILON);
    assert_close(zones[0].upper, 18.0 * 0.70, 1e-9);
    for pair in zones.windows(2) {
        assert_close(pair[1].lower, pair[0].upper, f64::EPSILON);
    }
    assert_eq!(zones[3].label, "Threshold");
}

#[test]
fn test_batch_reports_match_single_reports() {
    let engine = engine();
    let mut second = snapshot();
    second.athlete_id = "athlete-2".to_owned();
    second.vma.clear();

    let batch = engine.generate_reports(&[snapshot(), second.clone()], as_of());

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], engine.generate_report(&snapshot(), as_of()));
    assert_eq!(batch[1], engine.generate_report(&second, as_of()));
    assert!(batch[1].vma.is_none());
}

#[test]
fn test_empty_snapshot_lists_every_metric_as_unavailable() {
    let report = engine().generate_report(&AthleteSnapshot::default(), as_of());

    assert_eq!(report.available_count(), 0);
    assert_eq!(report.unavailable.len(), 6);
}

#[test]
fn test_snapshot_json_with_missing_sections() {
    let json = serde_json::json!({
        "athlete_id": "json-athlete",
        "vma": [
            {
                "magnitude": 17.0,
                "duration_seconds": 360.0,
                "heart_rate_percent": 0.95,
                "session_id": "s1",
                "session_date": days_ago(3.0)
            },
            {
                "magnitude": 17.0,
                "duration_seconds": 370.0,
                "heart_rate_percent": 0.95,
                "session_id": "s2",
                "session_date": days_ago(9.0)
            }
        ]
    });
    let snapshot: AthleteSnapshot = serde_json::from_value(json).unwrap();
    assert!(snapshot.ftp.is_empty());

    let report = engine().generate_report(&snapshot, as_of());
    assert_close(report.vma.as_ref().unwrap().value, 17.0, 1e-9);

    let rendered = serde_json::to_string(&report).unwrap();
    assert!(!rendered.contains("NaN"));
    assert!(rendered.contains("\"unavailable\""));
}

#[test]
fn test_assembler_keeps_explicit_failure_reasons() {
    let assembler = MetricReportAssembler::new(ZonesConfig::default());
    let estimated = EstimatedMetrics {
        failures: vec![UnavailableMetric::new("vma", "singular normal equations")],
        ..EstimatedMetrics::default()
    };

    let report = assembler.assemble(estimated, as_of(), "a-1");

    let vma: Vec<&UnavailableMetric> = report
        .unavailable
        .iter()
        .filter(|u| u.metric == "vma")
        .collect();
    assert_eq!(vma.len(), 1);
    assert_eq!(vma[0].reason, "singular normal equations");
    assert!(report
        .unavailable
        .iter()
        .filter(|u| u.metric != "vma")
        .all(|u| u.reason == "insufficient qualifying efforts"));
}

#[test]
fn test_future_dated_efforts_count_as_fresh() {
    let snapshot = AthleteSnapshot {
        vma: vec![
            EffortCandidate::new("tomorrow", as_of() + Duration::days(1), 18.2, 360.0)
                .with_heart_rate(0.95),
        ],
        ..AthleteSnapshot::default()
    };

    let report = engine().generate_report(&snapshot, as_of());
    let vma = report.vma.unwrap();
    assert!(vma.contributors[0].effort.age_days.abs() < f64::EPSILON);
}
