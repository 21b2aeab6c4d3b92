// ABOUTME: Benchmark fixtures generating realistic effort histories for every metric
// ABOUTME: Deterministic data so repeated runs measure the same work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for athlete snapshots.
//!
//! Efforts are dated relative to [`reference_time`] and vary by index so the
//! estimators see realistic spread rather than identical inputs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use threshold_engine::engine::AthleteSnapshot;
use threshold_engine::models::{AthleteContext, EffortCandidate, HybridEffort};

/// Mean-maximal grid shared by the CP fixtures
const CP_GRID: [f64; 11] = [
    60.0, 120.0, 180.0, 300.0, 420.0, 600.0, 900.0, 1200.0, 1800.0, 2400.0, 3600.0,
];

/// Predefined history sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum HistorySize {
    /// A few weeks of training
    Small,
    /// A full season
    Large,
}

impl HistorySize {
    /// Efforts generated per metric
    #[must_use]
    pub const fn efforts_per_metric(self) -> usize {
        match self {
            Self::Small => 8,
            Self::Large => 120,
        }
    }
}

/// Fixed reference time for every benchmark
///
/// # Panics
///
/// Never; the date literal is valid
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Deterministic wobble in `[-1, 1]` for `index`
#[allow(clippy::cast_precision_loss)]
fn wobble(index: usize, modulus: usize) -> f64 {
    ((index * 37) % modulus) as f64 / (modulus as f64 / 2.0) - 1.0
}

#[allow(clippy::cast_possible_wrap)]
fn session_date(index: usize) -> DateTime<Utc> {
    reference_time() - Duration::days((index % 150) as i64)
}

fn candidate(
    prefix: &str,
    index: usize,
    magnitude: f64,
    duration_seconds: f64,
    hr: f64,
) -> EffortCandidate {
    EffortCandidate::new(
        format!("{prefix}-{index}"),
        session_date(index),
        magnitude,
        duration_seconds,
    )
    .with_heart_rate(hr)
    .with_magnitude_cv(0.02 + 0.01 * wobble(index, 7).abs())
}

fn hybrid(index: usize, minutes: u32) -> HybridEffort {
    let base = 245.0 + 10.0 * wobble(index, 11);
    let samples = (0..minutes as usize * 60)
        .map(|s| if (s / 45) % 2 == 0 { base - 15.0 } else { base + 15.0 })
        .collect();
    HybridEffort {
        window_minutes: minutes,
        power_samples: samples,
        sample_interval_seconds: 1.0,
        heart_rate_percent: Some(0.86 + 0.05 * wobble(index, 5).abs()),
        heart_rate_drift_percent: Some(2.0 + 2.0 * wobble(index, 3).abs()),
        heart_rate_samples: Vec::new(),
        age_days: 0.0,
        session_id: format!("hybrid-{index}"),
        session_name: String::new(),
        session_date: session_date(index),
    }
}

/// Snapshot with efforts for every metric
#[must_use]
pub fn generate_snapshot(athlete: usize, size: HistorySize) -> AthleteSnapshot {
    let count = size.efforts_per_metric();
    let windows = [15, 20, 25, 30, 35, 40];

    AthleteSnapshot {
        athlete_id: format!("bench-athlete-{athlete}"),
        context: AthleteContext {
            max_heart_rate: Some(188.0),
            weight_kg: Some(68.0),
        },
        vma: (0..count)
            .map(|i| candidate("vma", i, 17.5 + 0.6 * wobble(i, 13), 360.0, 0.94))
            .collect(),
        ftp: (0..count)
            .map(|i| candidate("ftp", i, 270.0 + 15.0 * wobble(i, 17), 1200.0, 0.86))
            .collect(),
        css: (0..count)
            .map(|i| {
                let seconds = [150.0, 450.0, 900.0, 1200.0][i % 4];
                candidate("css", i, 1.30 + 0.05 * wobble(i, 9), seconds, 0.88)
            })
            .collect(),
        ftp_hybrid: (0..count.min(24))
            .map(|i| hybrid(i, windows[i % windows.len()]))
            .collect(),
        critical_power: (0..count)
            .map(|i| {
                let t = CP_GRID[i % CP_GRID.len()];
                let power = 255.0 + 21_000.0 / t + 8.0 * wobble(i, 19);
                candidate("cp", i, power, t, 0.90)
            })
            .collect(),
        critical_speed: (0..count)
            .map(|i| {
                let t = [120.0, 300.0, 600.0, 1200.0][i % 4];
                candidate("cs", i, 4.1 + 220.0 / t + 0.05 * wobble(i, 23), t, 0.90)
            })
            .collect(),
    }
}
