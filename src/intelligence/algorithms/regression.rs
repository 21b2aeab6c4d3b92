// ABOUTME: Weighted least squares for y = a + b·x with a single robust rejection pass
// ABOUTME: Robust scale from the median absolute deviation of residuals, plus fit statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Two-Parameter Linear Regression
//!
//! Solves the 2×2 normal equations of `y = intercept + slope · x` under
//! per-point weights. Both the critical power model (`P = CP + W'/t`) and the
//! swim regression (`d = CSS · t + D_ana`) reduce to this form.
//!
//! Robust refit: residuals are scaled by their MAD around the median residual.
//! A point whose deviation exceeds `k = multiplier × MAD` is dropped from the
//! re-solve. If that would leave fewer than two distinct regressors, outliers
//! instead keep `k/d` of their weight (Huber).

use crate::errors::{AppError, AppResult};
use threshold_core::models::FitStats;

/// Relative determinant below which the normal equations are singular
const SINGULAR_EPSILON: f64 = 1e-12;

/// MAD below this (relative to the mean |y|) means the data are exact
const EXACT_FIT_EPSILON: f64 = 1e-9;

/// One regression observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Regressor
    pub x: f64,
    /// Response
    pub y: f64,
    /// Non-negative weight
    pub weight: f64,
}

impl Observation {
    /// Create an observation
    #[must_use]
    pub const fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

/// Fitted line `y = intercept + slope · x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Value at `x = 0`
    pub intercept: f64,
    /// Change in `y` per unit of `x`
    pub slope: f64,
}

impl LinearFit {
    /// Predicted response at `x`
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Result of a (possibly robust) fit
#[derive(Debug, Clone, PartialEq)]
pub struct RobustFit {
    /// Final line
    pub fit: LinearFit,
    /// Weights used by the final solve
    pub weights: Vec<f64>,
    /// Number of points the robust pass rejected or down-weighted
    pub downweighted: usize,
}

/// Weighted least squares on columns `[1, x]`
///
/// # Errors
///
/// - `InsufficientData` if fewer than two points carry positive weight
/// - `SingularMatrix` if the weighted regressors have no spread
pub fn weighted_least_squares(observations: &[Observation]) -> AppResult<LinearFit> {
    let active = observations
        .iter()
        .filter(|obs| obs.weight > 0.0 && obs.weight.is_finite())
        .count();
    if active < 2 {
        return Err(AppError::insufficient_data(format!(
            "regression needs at least 2 weighted points, got {active}"
        )));
    }

    let (mut sw, mut swx, mut swy, mut swxx, mut swxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for obs in observations.iter().filter(|obs| obs.weight > 0.0) {
        sw += obs.weight;
        swx += obs.weight * obs.x;
        swy += obs.weight * obs.y;
        swxx += obs.weight * obs.x * obs.x;
        swxy += obs.weight * obs.x * obs.y;
    }

    let det = sw.mul_add(swxx, -(swx * swx));
    if !det.is_finite() || det.abs() <= SINGULAR_EPSILON * (sw * swxx).abs() {
        return Err(AppError::singular_matrix(format!(
            "normal equations are singular (det={det:e})"
        )));
    }

    let slope = sw.mul_add(swxy, -(swx * swy)) / det;
    let intercept = slope.mul_add(-swx, swy) / sw;

    Ok(LinearFit {
        intercept: AppError::ensure_finite(intercept, "regression intercept")?,
        slope: AppError::ensure_finite(slope, "regression slope")?,
    })
}

/// Median of a non-empty slice
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        f64::midpoint(values[mid - 1], values[mid])
    } else {
        values[mid]
    }
}

/// Weighted fit followed, when `mad_multiplier` is set, by one outlier rejection pass
///
/// # Errors
///
/// Propagates [`weighted_least_squares`] errors from either solve
pub fn robust_least_squares(
    observations: &[Observation],
    mad_multiplier: Option<f64>,
) -> AppResult<RobustFit> {
    let initial = weighted_least_squares(observations)?;
    let weights: Vec<f64> = observations.iter().map(|obs| obs.weight).collect();

    let Some(multiplier) = mad_multiplier else {
        return Ok(RobustFit {
            fit: initial,
            weights,
            downweighted: 0,
        });
    };

    let residuals: Vec<f64> = observations
        .iter()
        .map(|obs| obs.y - initial.predict(obs.x))
        .collect();
    let mut active: Vec<f64> = observations
        .iter()
        .zip(&residuals)
        .filter(|(obs, _)| obs.weight > 0.0)
        .map(|(_, residual)| *residual)
        .collect();
    let center = median(&mut active);
    let mut deviations: Vec<f64> = active.iter().map(|r| (r - center).abs()).collect();
    let mad = median(&mut deviations);

    let scale = observations
        .iter()
        .map(|obs| obs.y.abs())
        .sum::<f64>()
        / observations.len() as f64;
    if mad <= EXACT_FIT_EPSILON * scale.max(1.0) {
        return Ok(RobustFit {
            fit: initial,
            weights,
            downweighted: 0,
        });
    }

    let cutoff = multiplier * mad;
    let outliers: Vec<bool> = observations
        .iter()
        .zip(&residuals)
        .map(|(obs, residual)| obs.weight > 0.0 && (residual - center).abs() > cutoff)
        .collect();
    let downweighted = outliers.iter().filter(|outlier| **outlier).count();
    if downweighted == 0 {
        return Ok(RobustFit {
            fit: initial,
            weights,
            downweighted,
        });
    }

    let mut kept_x: Vec<f64> = observations
        .iter()
        .zip(&outliers)
        .filter(|(obs, outlier)| obs.weight > 0.0 && !**outlier)
        .map(|(obs, _)| obs.x)
        .collect();
    kept_x.sort_by(f64::total_cmp);
    kept_x.dedup();
    let reject = kept_x.len() >= 2;

    let reweighted: Vec<Observation> = observations
        .iter()
        .zip(&residuals)
        .zip(&outliers)
        .map(|((obs, residual), outlier)| {
            if !*outlier {
                *obs
            } else if reject {
                Observation::new(obs.x, obs.y, 0.0)
            } else {
                let deviation = (residual - center).abs();
                Observation::new(obs.x, obs.y, obs.weight * cutoff / deviation)
            }
        })
        .collect();

    let fit = weighted_least_squares(&reweighted)?;
    Ok(RobustFit {
        fit,
        weights: reweighted.iter().map(|obs| obs.weight).collect(),
        downweighted,
    })
}

/// Unweighted R² and RMSE over the observations with positive weight
#[must_use]
pub fn fit_statistics(observations: &[Observation], fit: &LinearFit) -> FitStats {
    let active: Vec<&Observation> = observations.iter().filter(|obs| obs.weight > 0.0).collect();
    if active.is_empty() {
        return FitStats {
            r2: 0.0,
            rmse: 0.0,
            n: 0,
        };
    }

    let n = active.len() as f64;
    let mean_y = active.iter().map(|obs| obs.y).sum::<f64>() / n;
    let ss_res: f64 = active
        .iter()
        .map(|obs| (obs.y - fit.predict(obs.x)).powi(2))
        .sum();
    let ss_tot: f64 = active.iter().map(|obs| (obs.y - mean_y).powi(2)).sum();

    let r2 = if ss_tot > f64::EPSILON * mean_y.abs().max(1.0) {
        1.0 - ss_res / ss_tot
    } else if ss_res <= f64::EPSILON * mean_y.abs().max(1.0) {
        1.0
    } else {
        0.0
    };

    FitStats {
        r2,
        rmse: (ss_res / n).sqrt(),
        n: active.len(),
    }
}
