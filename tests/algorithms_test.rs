// ABOUTME: Property tests for the pure algorithm layer (decay, quantile, confidence, NP, regression)
// ABOUTME: Checks monotonicity, boundary and invariance properties without running any estimator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::assert_close;
use threshold_engine::config::ConfidenceConfig;
use threshold_engine::errors::ErrorCode;
use threshold_engine::intelligence::algorithms::{
    confidence_percent, decay_weight, fit_statistics, normalized_power, robust_least_squares,
    scaled_confidence, variability_index, weighted_least_squares, weighted_quantile, Observation,
};
use threshold_engine::intelligence::heart_rate_drift_percent;
use threshold_engine::models::WeightedPoint;

// ============================================================================
// Temporal decay
// ============================================================================

#[test]
fn test_decay_is_strictly_decreasing_with_age() {
    let ages = [0.0, 1.0, 7.5, 30.0, 45.0, 90.0, 119.0];
    let weights: Vec<f64> = ages
        .iter()
        .map(|age| decay_weight(*age, 30.0, None).unwrap())
        .collect();
    for pair in weights.windows(2) {
        assert!(pair[0] > pair[1], "{} should exceed {}", pair[0], pair[1]);
    }
}

#[test]
fn test_decay_at_half_life_is_one_half() {
    for half_life in [7.0, 30.0, 42.0, 90.0] {
        assert_close(decay_weight(half_life, half_life, None).unwrap(), 0.5, 1e-12);
    }
}

#[test]
fn test_decay_zeroes_efforts_past_lookback() {
    assert!(decay_weight(120.0, 30.0, Some(120.0)).unwrap() > 0.0);
    assert!(decay_weight(120.5, 30.0, Some(120.0)).unwrap().abs() < f64::EPSILON);
}

#[test]
fn test_decay_rejects_non_positive_half_life() {
    let err = decay_weight(10.0, -1.0, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidParameter);
}

// ============================================================================
// Weighted quantile
// ============================================================================

fn sample_points() -> Vec<WeightedPoint> {
    vec![
        WeightedPoint::new(17.2, 0.4),
        WeightedPoint::new(18.1, 1.0),
        WeightedPoint::new(16.0, 0.0),
        WeightedPoint::new(17.8, 0.7),
        WeightedPoint::new(18.4, 0.2),
        WeightedPoint::new(17.5, 0.9),
    ]
}

#[test]
fn test_quantile_zero_is_minimum_with_weight() {
    // 16.0 carries no weight and must not be the minimum
    let q0 = weighted_quantile(&sample_points(), 0.0).unwrap();
    assert_close(q0, 17.2, 1e-12);
}

#[test]
fn test_quantile_one_is_maximum() {
    let q1 = weighted_quantile(&sample_points(), 1.0).unwrap();
    assert_close(q1, 18.4, 1e-12);
}

#[test]
fn test_quantile_is_order_independent() {
    let points = sample_points();
    let mut reversed = points.clone();
    reversed.reverse();
    let mut rotated = points.clone();
    rotated.rotate_left(2);

    for q in [0.1, 0.5, 0.75, 0.9] {
        let expected = weighted_quantile(&points, q).unwrap();
        assert_close(weighted_quantile(&reversed, q).unwrap(), expected, 1e-12);
        assert_close(weighted_quantile(&rotated, q).unwrap(), expected, 1e-12);
    }
}

#[test]
fn test_quantile_is_weight_scale_invariant() {
    let points = sample_points();
    for scale in [0.01, 3.0, 250.0] {
        let scaled: Vec<WeightedPoint> = points
            .iter()
            .map(|p| WeightedPoint::new(p.value, p.weight * scale))
            .collect();
        for q in [0.25, 0.5, 0.9] {
            assert_close(
                weighted_quantile(&scaled, q).unwrap(),
                weighted_quantile(&points, q).unwrap(),
                1e-9,
            );
        }
    }
}

#[test]
fn test_quantile_is_within_observed_range() {
    let points = sample_points();
    for step in 0..=20 {
        let q = f64::from(step) / 20.0;
        let value = weighted_quantile(&points, q).unwrap();
        assert!((17.2..=18.4).contains(&value), "q={q} gave {value}");
    }
}

#[test]
fn test_quantile_rejects_level_outside_unit_interval() {
    for q in [-0.1, 1.5, f64::NAN] {
        let err = weighted_quantile(&sample_points(), q).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }
}

#[test]
fn test_quantile_of_empty_input_is_insufficient() {
    let err = weighted_quantile(&[], 0.5).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientData);
}

// ============================================================================
// Confidence
// ============================================================================

#[test]
fn test_confidence_stays_in_bounds() {
    let config = ConfidenceConfig::default();
    for n in [0, 1, 3, 10, 1000] {
        for cv in [0.0, 0.02, 0.5, 10.0, f64::INFINITY] {
            for age in [0.0, 30.0, 365.0] {
                let confidence = confidence_percent(n, cv, age, 30.0, &config);
                assert!(confidence <= 100);
            }
        }
    }
}

#[test]
fn test_confidence_never_drops_with_more_candidates() {
    let config = ConfidenceConfig::default();
    let mut previous = 0;
    for n in 0..40 {
        let confidence = confidence_percent(n, 0.03, 12.0, 30.0, &config);
        assert!(confidence >= previous, "n={n}: {confidence} < {previous}");
        previous = confidence;
    }
}

#[test]
fn test_confidence_drops_with_dispersion_and_age() {
    let config = ConfidenceConfig::default();
    let tight = confidence_percent(5, 0.01, 10.0, 30.0, &config);
    let loose = confidence_percent(5, 0.20, 10.0, 30.0, &config);
    let stale = confidence_percent(5, 0.01, 90.0, 30.0, &config);
    assert!(tight > loose);
    assert!(tight > stale);
}

#[test]
fn test_confidence_for_no_candidates_is_zero() {
    assert_eq!(
        confidence_percent(0, 0.0, 0.0, 30.0, &ConfidenceConfig::default()),
        0
    );
}

#[test]
fn test_scaled_confidence_clamps_factor() {
    assert_eq!(scaled_confidence(80, 1.0), 80);
    assert_eq!(scaled_confidence(80, 0.5), 40);
    assert_eq!(scaled_confidence(80, -0.3), 0);
    assert_eq!(scaled_confidence(80, 2.0), 80);
    assert_eq!(scaled_confidence(80, f64::NAN), 0);
}

// ============================================================================
// Normalized power
// ============================================================================

#[test]
fn test_normalized_power_of_steady_ride_equals_power() {
    let samples = common::constant_power(250.0, 20);
    assert_close(normalized_power(&samples, 1.0, 30.0).unwrap(), 250.0, 1e-6);
    assert_close(variability_index(&samples, 1.0, 30.0).unwrap(), 1.0, 1e-9);
}

#[test]
fn test_normalized_power_exceeds_mean_for_surges() {
    // 60 s blocks alternating between 150 W and 350 W, mean 250 W
    let samples: Vec<f64> = (0..1200)
        .map(|i| if (i / 60) % 2 == 0 { 150.0 } else { 350.0 })
        .collect();
    let np = normalized_power(&samples, 1.0, 30.0).unwrap();
    assert!(np > 250.0, "NP {np} should exceed the mean");
    assert!(variability_index(&samples, 1.0, 30.0).unwrap() > 1.05);
}

#[test]
fn test_normalized_power_honours_sample_interval() {
    // 5 s sampling: the 30 s window spans six samples
    let samples = vec![200.0; 6];
    assert_close(normalized_power(&samples, 5.0, 30.0).unwrap(), 200.0, 1e-9);
    let err = normalized_power(&samples[..5], 5.0, 30.0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientData);
}

#[test]
fn test_normalized_power_short_stream_is_insufficient() {
    let err = normalized_power(&[250.0; 10], 1.0, 30.0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientData);
}

#[test]
fn test_normalized_power_rejects_bad_interval() {
    let err = normalized_power(&[250.0; 60], 0.0, 30.0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidParameter);
}

// ============================================================================
// Heart rate drift
// ============================================================================

#[test]
fn test_heart_rate_drift_compares_halves() {
    let mut samples = vec![150.0; 600];
    samples.extend(vec![159.0; 600]);
    assert_close(heart_rate_drift_percent(&samples).unwrap(), 6.0, 1e-9);
    assert!(heart_rate_drift_percent(&[150.0]).is_none());
}

// ============================================================================
// Weighted least squares
// ============================================================================

#[test]
fn test_wls_recovers_hyperbolic_parameters() {
    let observations: Vec<Observation> = [120.0, 300.0, 600.0, 1200.0]
        .iter()
        .map(|t| Observation::new(1.0 / t, 250.0 + 20_000.0 / t, 1.0))
        .collect();
    let fit = weighted_least_squares(&observations).unwrap();
    assert_close(fit.intercept, 250.0, 1e-6);
    assert_close(fit.slope, 20_000.0, 1e-6);

    let stats = fit_statistics(&observations, &fit);
    assert_close(stats.r2, 1.0, 1e-9);
    assert!(stats.rmse < 1e-6);
    assert_eq!(stats.n, 4);
}

#[test]
fn test_wls_needs_two_distinct_regressors() {
    let single = [Observation::new(0.01, 300.0, 1.0)];
    assert_eq!(
        weighted_least_squares(&single).unwrap_err().code,
        ErrorCode::InsufficientData
    );

    let clustered = [
        Observation::new(0.01, 300.0, 1.0),
        Observation::new(0.01, 310.0, 2.0),
    ];
    assert_eq!(
        weighted_least_squares(&clustered).unwrap_err().code,
        ErrorCode::SingularMatrix
    );
}

#[test]
fn test_robust_pass_drops_outlier_and_recovers_clean_line() {
    let mut observations: Vec<Observation> = [60.0, 120.0, 300.0, 600.0, 1200.0, 1800.0, 3600.0]
        .iter()
        .map(|t| Observation::new(1.0 / t, 250.0 + 20_000.0 / t, 1.0))
        .collect();
    // a poorly paced 30 minute effort
    observations[5].y -= 100.0;

    let naive = robust_least_squares(&observations, None).unwrap();
    let robust = robust_least_squares(&observations, Some(1.5)).unwrap();

    assert_eq!(naive.downweighted, 0);
    assert!(robust.downweighted >= 1);
    assert!(robust.weights[5].abs() < f64::EPSILON);
    assert!((robust.fit.intercept - 250.0).abs() < 1e-6);
    assert!((robust.fit.slope - 20_000.0).abs() < 1e-3);
    assert!((naive.fit.intercept - 250.0).abs() > 10.0);
}
