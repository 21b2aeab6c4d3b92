// ABOUTME: Effort quality scoring from pacing stability, heart rate fit and environment
// ABOUTME: Produces a weight in [0, 1] expressing how well an effort was executed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::QualityPolicy;
use threshold_core::models::EffortCandidate;

/// Stability term `max(0, 1 - cv / threshold)`; absent cv is neutral
fn stability_score(cv: Option<f64>, stability_threshold: f64) -> f64 {
    cv.filter(|value| value.is_finite())
        .map_or(1.0, |value| (1.0 - value.abs() / stability_threshold).max(0.0))
}

/// Gaussian fit of observed HR around the protocol's target
fn heart_rate_score(hr: Option<f64>, policy: &QualityPolicy) -> f64 {
    match hr.filter(|value| value.is_finite()) {
        Some(observed) => {
            let delta = observed - policy.target_hr_percent;
            (-(delta * delta) / (2.0 * policy.hr_tolerance * policy.hr_tolerance)).exp()
        }
        None if policy.require_heart_rate => 0.0,
        None => 1.0,
    }
}

/// Quality weight of one effort, clamped to `[0, 1]`
#[must_use]
pub fn quality_weight(candidate: &EffortCandidate, policy: &QualityPolicy) -> f64 {
    let stability = stability_score(candidate.magnitude_cv, policy.stability_threshold);
    let heart_rate = heart_rate_score(candidate.heart_rate_percent, policy);
    let environment = candidate
        .environment_factor
        .filter(|factor| factor.is_finite())
        .map_or(1.0, |factor| factor.clamp(0.0, 1.0));

    (stability * heart_rate * environment).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate() -> EffortCandidate {
        EffortCandidate::new("s1", Utc::now(), 18.0, 360.0)
    }

    #[test]
    fn test_on_target_effort_scores_one() {
        let policy = QualityPolicy::targeting(0.95);
        let weight = quality_weight(&candidate().with_heart_rate(0.95), &policy);
        assert!((weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_hr_depends_on_policy() {
        let mut policy = QualityPolicy::targeting(0.95);
        assert!((quality_weight(&candidate(), &policy) - 1.0).abs() < 1e-12);
        policy.require_heart_rate = true;
        assert!(quality_weight(&candidate(), &policy).abs() < 1e-12);
    }

    #[test]
    fn test_unstable_pacing_zeroes_weight() {
        let policy = QualityPolicy::targeting(0.95);
        let weight = quality_weight(&candidate().with_magnitude_cv(0.20), &policy);
        assert!(weight.abs() < 1e-12);
    }

    #[test]
    fn test_one_tolerance_off_target() {
        let policy = QualityPolicy::targeting(0.95);
        let weight = quality_weight(&candidate().with_heart_rate(0.90), &policy);
        assert!((weight - (-0.5_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_environment_factor_multiplies_and_clamps() {
        let policy = QualityPolicy::targeting(0.95);
        let hot = candidate()
            .with_name("Hot track session")
            .with_heart_rate(0.95)
            .with_environment_factor(0.5);
        assert!((quality_weight(&hot, &policy) - 0.5).abs() < 1e-12);

        let off_target = candidate()
            .with_heart_rate(0.90)
            .with_environment_factor(0.5);
        let expected = 0.5 * (-0.5_f64).exp();
        assert!((quality_weight(&off_target, &policy) - expected).abs() < 1e-9);

        let boosted = candidate()
            .with_heart_rate(0.95)
            .with_environment_factor(1.7);
        assert!((quality_weight(&boosted, &policy) - 1.0).abs() < 1e-12);
    }
}
