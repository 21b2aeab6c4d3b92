// ABOUTME: Exponential recency weighting with a configurable half-life and hard age cutoff
// ABOUTME: Older efforts contribute less evidence to a threshold estimate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use std::f64::consts::LN_2;

/// Recency weight `exp(-ln2 · age / half_life)`
///
/// Negative ages count as zero. Efforts older than `max_age_days` weigh zero.
///
/// # Errors
///
/// Returns `InvalidParameter` if `half_life_days` is not a positive finite
/// number or `age_days` is not finite
pub fn decay_weight(
    age_days: f64,
    half_life_days: f64,
    max_age_days: Option<f64>,
) -> AppResult<f64> {
    if !half_life_days.is_finite() || half_life_days <= 0.0 {
        return Err(AppError::invalid_parameter(format!(
            "half_life_days must be > 0, got {half_life_days}"
        )));
    }
    if !age_days.is_finite() {
        return Err(AppError::invalid_parameter(format!(
            "age_days must be finite, got {age_days}"
        )));
    }

    let age = age_days.max(0.0);
    if max_age_days.is_some_and(|max_age| age > max_age) {
        return Ok(0.0);
    }

    Ok((-LN_2 * age / half_life_days).exp())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_effort_has_full_weight() {
        let weight = decay_weight(0.0, 30.0, None).unwrap();
        assert!((weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cutoff_is_strict() {
        assert!(decay_weight(120.0, 30.0, Some(120.0)).unwrap() > 0.0);
        assert!(decay_weight(120.5, 30.0, Some(120.0)).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(decay_weight(1.0, 0.0, None).is_err());
        assert!(decay_weight(1.0, f64::NAN, None).is_err());
        assert!(decay_weight(f64::INFINITY, 30.0, None).is_err());
    }
}
