// ABOUTME: Shared fixtures for threshold engine integration tests
// ABOUTME: Fixed reference time, effort builders, power streams and quiet test logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities
//!
//! Every test uses the same reference time so ages derived from session dates
//! are deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Once;
use threshold_engine::models::{EffortCandidate, HybridEffort};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Reference time shared by every test
pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Session date `days` before [`as_of`]
pub fn days_ago(days: f64) -> DateTime<Utc> {
    as_of() - Duration::seconds((days * 86_400.0).round() as i64)
}

/// Candidate dated `age_days` before [`as_of`], with `age_days` already set
pub fn effort(id: &str, magnitude: f64, duration_seconds: f64, age_days: f64) -> EffortCandidate {
    EffortCandidate::new(id, days_ago(age_days), magnitude, duration_seconds)
        .with_age_days(age_days)
}

/// Candidate with a heart rate fraction
pub fn effort_with_hr(
    id: &str,
    magnitude: f64,
    duration_seconds: f64,
    age_days: f64,
    hr: f64,
) -> EffortCandidate {
    effort(id, magnitude, duration_seconds, age_days).with_heart_rate(hr)
}

/// Mean-maximal points sampled exactly from `threshold + reserve / t`
pub fn hyperbolic_efforts(threshold: f64, reserve: f64, durations: &[f64]) -> Vec<EffortCandidate> {
    durations
        .iter()
        .map(|t| effort(&format!("mmp-{t}"), threshold + reserve / t, *t, 0.0))
        .collect()
}

/// Constant power stream of `minutes` at 1 Hz
pub fn constant_power(watts: f64, minutes: u32) -> Vec<f64> {
    vec![watts; minutes as usize * 60]
}

/// FTP-Hybrid effort with a constant power stream
pub fn hybrid_effort(id: &str, minutes: u32, watts: f64, hr: Option<f64>) -> HybridEffort {
    HybridEffort {
        window_minutes: minutes,
        power_samples: constant_power(watts, minutes),
        sample_interval_seconds: 1.0,
        heart_rate_percent: hr,
        heart_rate_drift_percent: None,
        heart_rate_samples: Vec::new(),
        age_days: 0.0,
        session_id: id.to_owned(),
        session_name: String::new(),
        session_date: as_of(),
    }
}

/// Assert `actual` is within `tolerance` of `expected`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
