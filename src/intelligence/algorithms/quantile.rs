// ABOUTME: Weighted quantile, mean and standard deviation over weighted effort values
// ABOUTME: Order-independent interpolation on centred cumulative weight positions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Weighted Aggregation
//!
//! Each distinct value is placed at the centre of its weight mass on the
//! cumulative axis, `(C_i - w_i / 2) / W`. The quantile is read off by linear
//! interpolation between neighbouring positions. Values below the first
//! position or above the last one return the extreme values, so `q = 0` is
//! the minimum and `q = 1` the maximum.
//!
//! Equal values are merged before positions are computed. Combined with a
//! stable sort on `f64::total_cmp` this makes the result independent of the
//! order in which points are supplied.

use crate::errors::{AppError, AppResult};
use threshold_core::models::WeightedPoint;

/// Points with a finite value and a positive finite weight
fn usable(points: &[WeightedPoint]) -> Vec<WeightedPoint> {
    points
        .iter()
        .filter(|point| point.value.is_finite() && point.weight.is_finite() && point.weight > 0.0)
        .copied()
        .collect()
}

/// Sort ascending and merge equal values by summing their weights
fn merged_sorted(mut points: Vec<WeightedPoint>) -> Vec<WeightedPoint> {
    points.sort_by(|a, b| a.value.total_cmp(&b.value));
    let mut merged: Vec<WeightedPoint> = Vec::with_capacity(points.len());
    for point in points {
        match merged.last_mut() {
            Some(last) if last.value.total_cmp(&point.value).is_eq() => last.weight += point.weight,
            _ => merged.push(point),
        }
    }
    merged
}

/// Weighted quantile of `points` at level `q`
///
/// # Errors
///
/// - `InvalidParameter` if `q` is outside `[0, 1]`
/// - `InsufficientData` if no point has a positive finite weight
pub fn weighted_quantile(points: &[WeightedPoint], q: f64) -> AppResult<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(AppError::invalid_parameter(format!(
            "quantile must be within [0, 1], got {q}"
        )));
    }

    let merged = merged_sorted(usable(points));
    let (Some(first), Some(last)) = (merged.first(), merged.last()) else {
        return Err(AppError::insufficient_data(
            "no points with positive weight to aggregate",
        ));
    };
    if merged.len() == 1 {
        return Ok(first.value);
    }

    let total: f64 = merged.iter().map(|point| point.weight).sum();
    let mut cumulative = 0.0;
    let positions: Vec<f64> = merged
        .iter()
        .map(|point| {
            cumulative += point.weight;
            (cumulative - point.weight / 2.0) / total
        })
        .collect();

    if q <= positions[0] {
        return Ok(first.value);
    }
    if q >= positions[positions.len() - 1] {
        return Ok(last.value);
    }

    // First index whose position exceeds q; always in 1..len here
    let upper = positions.partition_point(|position| *position <= q);
    let lower = upper - 1;
    let span = positions[upper] - positions[lower];
    let fraction = if span > 0.0 {
        (q - positions[lower]) / span
    } else {
        0.0
    };
    let value = merged[lower].value + fraction * (merged[upper].value - merged[lower].value);

    AppError::ensure_finite(value, "weighted quantile")
}

/// Weighted arithmetic mean
///
/// # Errors
///
/// Returns `InsufficientData` if no point has a positive finite weight
pub fn weighted_mean(points: &[WeightedPoint]) -> AppResult<f64> {
    let points = usable(points);
    let total: f64 = points.iter().map(|point| point.weight).sum();
    if points.is_empty() || total <= 0.0 {
        return Err(AppError::insufficient_data(
            "no points with positive weight to average",
        ));
    }
    let sum: f64 = points.iter().map(|point| point.value * point.weight).sum();
    AppError::ensure_finite(sum / total, "weighted mean")
}

/// Weighted population standard deviation
///
/// # Errors
///
/// Returns `InsufficientData` if no point has a positive finite weight
pub fn weighted_std_dev(points: &[WeightedPoint]) -> AppResult<f64> {
    let mean = weighted_mean(points)?;
    let points = usable(points);
    let total: f64 = points.iter().map(|point| point.weight).sum();
    let variance: f64 = points
        .iter()
        .map(|point| point.weight * (point.value - mean).powi(2))
        .sum::<f64>()
        / total;
    AppError::ensure_finite(variance.sqrt(), "weighted standard deviation")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn points(values: &[(f64, f64)]) -> Vec<WeightedPoint> {
        values
            .iter()
            .map(|(value, weight)| WeightedPoint::new(*value, *weight))
            .collect()
    }

    #[test]
    fn test_median_of_two_equal_weights() {
        let data = points(&[(10.0, 1.0), (20.0, 1.0)]);
        let median = weighted_quantile(&data, 0.5).unwrap();
        assert!((median - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weights_are_excluded() {
        let data = points(&[(10.0, 1.0), (99.0, 0.0), (12.0, 1.0)]);
        assert!((weighted_quantile(&data, 1.0).unwrap() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_weights_is_insufficient() {
        let data = points(&[(10.0, 0.0), (12.0, 0.0)]);
        assert!(weighted_quantile(&data, 0.5).is_err());
        assert!(weighted_mean(&data).is_err());
    }

    #[test]
    fn test_std_dev_of_constant_values_is_zero() {
        let data = points(&[(5.0, 0.3), (5.0, 0.7)]);
        assert!(weighted_std_dev(&data).unwrap().abs() < 1e-12);
    }
}
