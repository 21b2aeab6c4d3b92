// ABOUTME: Tests for effort and metric models in threshold-core
// ABOUTME: Covers age rebasing, athlete ratios, and JSON defaults for snapshot inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Duration, TimeZone, Utc};
use threshold_core::models::{
    age_in_days, AthleteContext, EffortCandidate, HybridEffort, MetricKind,
};

#[test]
fn test_rebased_age_uses_reference_time() {
    let as_of = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let session = as_of - Duration::days(10) - Duration::hours(12);
    let candidate = EffortCandidate::new("s1", session, 18.0, 360.0).with_age_days(99.0);

    let rebased = candidate.rebased(as_of);

    assert!((rebased.age_days - 10.5).abs() < 1e-9);
    // the original is untouched
    assert!((candidate.age_days - 99.0).abs() < f64::EPSILON);
}

#[test]
fn test_future_sessions_have_zero_age() {
    let as_of = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let future = as_of + Duration::days(2);
    assert!(age_in_days(future, as_of).abs() < f64::EPSILON);
}

#[test]
fn test_athlete_context_ratios() {
    let athlete = AthleteContext {
        max_heart_rate: Some(190.0),
        weight_kg: Some(70.0),
    };
    assert!((athlete.heart_rate_fraction(171.0).unwrap() - 0.9).abs() < 1e-9);
    assert!((athlete.per_kg(280.0).unwrap() - 4.0).abs() < 1e-9);

    let unknown = AthleteContext::default();
    assert!(unknown.heart_rate_fraction(150.0).is_none());
    assert!(unknown.per_kg(280.0).is_none());
}

#[test]
fn test_candidate_json_defaults() {
    let json = r#"{
        "magnitude": 250.0,
        "duration_seconds": 1200.0,
        "session_id": "ride-42",
        "session_date": "2025-05-20T07:30:00Z"
    }"#;
    let candidate: EffortCandidate = serde_json::from_str(json).unwrap();

    assert!(candidate.heart_rate_percent.is_none());
    assert!(candidate.magnitude_cv.is_none());
    assert!(candidate.session_name.is_empty());
    assert!(candidate.age_days.abs() < f64::EPSILON);
}

#[test]
fn test_hybrid_effort_as_candidate_keeps_provenance() {
    let date = Utc.with_ymd_and_hms(2025, 5, 2, 6, 0, 0).unwrap();
    let effort = HybridEffort {
        window_minutes: 20,
        power_samples: vec![250.0; 1200],
        sample_interval_seconds: 1.0,
        heart_rate_percent: Some(0.92),
        heart_rate_drift_percent: None,
        heart_rate_samples: Vec::new(),
        age_days: 3.0,
        session_id: "ride-7".into(),
        session_name: "Hill reps".into(),
        session_date: date,
    };

    let candidate = effort.as_candidate(240.0);

    assert_eq!(candidate.session_id, "ride-7");
    assert!((candidate.duration_seconds - 1200.0).abs() < f64::EPSILON);
    assert!((candidate.magnitude - 240.0).abs() < f64::EPSILON);
}

#[test]
fn test_metric_kind_serializes_snake_case() {
    let json = serde_json::to_string(&MetricKind::FtpHybrid).unwrap();
    assert_eq!(json, "\"ftp_hybrid\"");
    assert!(MetricKind::Ftp.is_power());
    assert!(!MetricKind::Vma.is_power());
}
