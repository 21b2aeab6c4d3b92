// ABOUTME: Confidence scoring from evidence count, dispersion and recency
// ABOUTME: Combines three saturating scores into an integer percentage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::ConfidenceConfig;
use std::f64::consts::LN_2;

/// Confidence percentage in `[0, 100]`
///
/// - count: `1 - exp(-n / count_scale)`
/// - dispersion: `1 / (1 + (cv / cv_reference)²)`
/// - recency: `exp(-ln2 · mean_age / half_life)`
///
/// Non-decreasing in `n`, non-increasing in `cv` and `mean_age_days`.
#[must_use]
pub fn confidence_percent(
    n: usize,
    cv: f64,
    mean_age_days: f64,
    half_life_days: f64,
    config: &ConfidenceConfig,
) -> u8 {
    if n == 0 {
        return 0;
    }

    let count = 1.0 - (-(n as f64) / config.count_scale).exp();
    let dispersion = if cv.is_finite() {
        1.0 / (1.0 + (cv.abs() / config.cv_reference).powi(2))
    } else {
        0.0
    };
    let recency = if mean_age_days.is_finite() && half_life_days > 0.0 {
        (-LN_2 * mean_age_days.max(0.0) / half_life_days).exp()
    } else {
        0.0
    };

    let combined = config.recency_weight.mul_add(
        recency,
        config
            .count_weight
            .mul_add(count, config.dispersion_weight * dispersion),
    );
    (combined * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Scale a confidence percentage by a fit-quality factor in `[0, 1]`
#[must_use]
pub fn scaled_confidence(base: u8, factor: f64) -> u8 {
    let factor = if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (f64::from(base) * factor).round().clamp(0.0, 100.0) as u8
}
