// ABOUTME: Two-parameter critical model fitter for CP/W' (cycling) and CS/D' (running)
// ABOUTME: Mean-maximal point selection, recency/HR/band weighting, robust WLS and plausibility clamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Critical Model Fitting
//!
//! Model: `magnitude(t) = threshold + reserve / t`, linear in `x = 1/t`.
//!
//! 1. one mean-maximal effort per grid duration (relative tolerance match)
//! 2. weight = recency decay x heart-rate penalty x `1 / points_in_band`
//! 3. weighted least squares, then one outlier rejection pass on MAD-scaled residuals
//! 4. clamp the reserve into its plausible range when R² is poor or the
//!    reserve is out of range, re-estimating the threshold with it fixed
//! 5. predict time to exhaustion at supra-threshold intensities
//!
//! # Scientific References
//!
//! - Monod, H., & Scherrer, J. (1965). The work capacity of a synergic muscular group.
//! - Hill, D.W. (1993). The critical power concept. *Sports Medicine*, 16(4).

use super::algorithms::{
    confidence_percent, decay_weight, fit_statistics, robust_least_squares, scaled_confidence,
    LinearFit, Observation,
};
use crate::config::CriticalModelConfig;
use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;
use threshold_core::models::{
    CriticalModel, CriticalModelMetadata, EffortCandidate, EffortContribution,
};
use tracing::debug;

/// A mean-maximal effort chosen for one grid duration
#[derive(Debug, Clone)]
struct CurvePoint<'a> {
    effort: &'a EffortCandidate,
    band: Option<&'a str>,
}

/// Fitter for one two-parameter model
#[derive(Debug, Clone)]
pub struct CriticalModelFitter {
    config: CriticalModelConfig,
}

impl CriticalModelFitter {
    /// Create a fitter from a validated configuration
    #[must_use]
    pub const fn new(config: CriticalModelConfig) -> Self {
        Self { config }
    }

    /// Best effort per grid duration, restricted to configured bands
    fn select_points<'a>(&'a self, candidates: &'a [EffortCandidate]) -> Vec<CurvePoint<'a>> {
        let cfg = &self.config;
        let eligible: Vec<(usize, &EffortCandidate)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.magnitude.is_finite()
                    && c.magnitude > 0.0
                    && c.duration_seconds.is_finite()
                    && c.duration_seconds > 0.0
                    && c.age_days.is_finite()
                    && c.age_days <= cfg.max_age_days
            })
            .collect();

        let mut used = vec![false; candidates.len()];
        let mut points = Vec::with_capacity(cfg.duration_grid.len());
        for grid in &cfg.duration_grid {
            let best = eligible
                .iter()
                .filter(|(index, c)| {
                    !used[*index]
                        && ((c.duration_seconds - grid).abs() / grid) <= cfg.grid_tolerance
                })
                .max_by(|(_, a), (_, b)| a.magnitude.total_cmp(&b.magnitude));
            let Some(&(index, effort)) = best else {
                continue;
            };

            let band = if cfg.bands.is_empty() {
                None
            } else {
                match cfg.band_for(effort.duration_seconds) {
                    Some(band) => Some(band.name.as_str()),
                    None => continue,
                }
            };
            used[index] = true;
            points.push(CurvePoint { effort, band });
        }
        points
    }

    /// HR penalty against the band's expected maximal-effort heart rate
    fn heart_rate_penalty(&self, point: &CurvePoint<'_>) -> f64 {
        let cfg = &self.config;
        let expected = point
            .band
            .and_then(|name| cfg.bands.iter().find(|band| band.name == name))
            .and_then(|band| band.expected_hr_percent);
        match (point.effort.heart_rate_percent, expected) {
            (Some(hr), Some(expected)) if hr.is_finite() && hr < expected => {
                (1.0 - (expected - hr) / cfg.hr_penalty_span).max(cfg.hr_penalty_floor)
            }
            _ => 1.0,
        }
    }

    /// Initial fit weights; returns the weights and how many the HR penalty reduced
    fn point_weights(&self, points: &[CurvePoint<'_>]) -> AppResult<(Vec<f64>, usize)> {
        let mut band_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for point in points {
            if let Some(band) = point.band {
                *band_counts.entry(band).or_default() += 1;
            }
        }

        let mut penalized = 0;
        let mut weights = Vec::with_capacity(points.len());
        for point in points {
            let decay = decay_weight(point.effort.age_days, self.config.half_life_days, None)?;
            let penalty = self.heart_rate_penalty(point);
            if penalty < 1.0 {
                penalized += 1;
            }
            let band_weight = point
                .band
                .and_then(|band| band_counts.get(band))
                .map_or(1.0, |count| 1.0 / *count as f64);
            weights.push(decay * penalty * band_weight);
        }
        Ok((weights, penalized))
    }

    /// Fit the model to `candidates`
    ///
    /// Returns `Ok(None)` with fewer than `min_points` distinct grid durations.
    ///
    /// # Errors
    ///
    /// - `SingularMatrix` if the weighted durations have no spread
    /// - `InsufficientData` if the fitted threshold is not positive
    /// - `NonFiniteResult` if any output is not finite
    pub fn fit(&self, candidates: &[EffortCandidate]) -> AppResult<Option<CriticalModel>> {
        let cfg = &self.config;
        let kind = cfg.kind;
        let points = self.select_points(candidates);
        if points.len() < cfg.min_points {
            debug!(
                model = %kind,
                points = points.len(),
                required = cfg.min_points,
                "Not enough mean-maximal points"
            );
            return Ok(None);
        }

        let (weights, penalized) = self.point_weights(&points)?;
        let observations: Vec<Observation> = points
            .iter()
            .zip(&weights)
            .map(|(point, weight)| {
                Observation::new(
                    1.0 / point.effort.duration_seconds,
                    point.effort.magnitude,
                    *weight,
                )
            })
            .collect();

        let robust = robust_least_squares(
            &observations,
            cfg.robust_reweighting.then_some(cfg.huber_mad_multiplier),
        )?;
        let final_observations: Vec<Observation> = observations
            .iter()
            .zip(&robust.weights)
            .map(|(obs, weight)| Observation::new(obs.x, obs.y, *weight))
            .collect();

        let unconstrained = robust.fit;
        let unconstrained_stats = fit_statistics(&final_observations, &unconstrained);
        let unconstrained_reserve = unconstrained.slope * cfg.reserve_scale;
        let low_fit_quality = unconstrained_stats.r2 < cfg.r2_floor;
        let out_of_range = !(cfg.reserve_min..=cfg.reserve_max).contains(&unconstrained_reserve);

        let (fit, reserve_clamped) = if low_fit_quality || out_of_range {
            let clamped = unconstrained_reserve.clamp(cfg.reserve_min, cfg.reserve_max);
            debug!(
                model = %kind,
                r2 = unconstrained_stats.r2,
                unconstrained_reserve = unconstrained_reserve,
                clamped_reserve = clamped,
                "Reserve constrained to plausible range"
            );
            (
                Self::refit_with_reserve(&final_observations, clamped / cfg.reserve_scale)?,
                out_of_range,
            )
        } else {
            (unconstrained, false)
        };

        let threshold = AppError::ensure_finite(fit.intercept, kind.name())?;
        if threshold <= 0.0 {
            return Err(AppError::insufficient_data(format!(
                "{kind} fit produced a non-positive threshold ({threshold:.3})"
            )));
        }
        let reserve_native = AppError::ensure_finite(fit.slope, kind.name())?;
        let stats = fit_statistics(&final_observations, &fit);

        let predictions = self.predictions(threshold, reserve_native);
        let contributors: Vec<EffortContribution> = points
            .iter()
            .zip(&robust.weights)
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(point, weight)| EffortContribution {
                effort: point.effort.clone(),
                weight: *weight,
            })
            .collect();

        let mean_age =
            points.iter().map(|p| p.effort.age_days).sum::<f64>() / points.len() as f64;
        let base = confidence_percent(
            stats.n,
            stats.rmse / threshold,
            mean_age,
            cfg.half_life_days,
            &cfg.confidence,
        );

        let bands = cfg
            .bands
            .iter()
            .filter(|band| points.iter().any(|p| p.band == Some(band.name.as_str())))
            .map(|band| band.name.clone())
            .collect();

        debug!(
            model = %kind,
            threshold = threshold,
            reserve = reserve_native * cfg.reserve_scale,
            r2 = stats.r2,
            points = stats.n,
            downweighted = robust.downweighted,
            hr_penalized = penalized,
            "Critical model fitted"
        );

        Ok(Some(CriticalModel {
            kind,
            threshold_value: threshold,
            reserve_value: reserve_native * cfg.reserve_scale,
            fit_stats: stats,
            predictions,
            confidence_percent: scaled_confidence(base, stats.r2),
            contributors,
            metadata: CriticalModelMetadata {
                reserve_clamped,
                unconstrained_reserve,
                low_fit_quality,
                downweighted_points: robust.downweighted,
                robust_reweighting: cfg.robust_reweighting,
                bands,
            },
            per_kg: None,
        }))
    }

    /// Threshold as the weighted mean of `y - reserve·x` with the reserve held fixed
    fn refit_with_reserve(observations: &[Observation], reserve: f64) -> AppResult<LinearFit> {
        let (weighted_sum, total) = observations
            .iter()
            .filter(|obs| obs.weight > 0.0)
            .fold((0.0, 0.0), |(sum, total), obs| {
                (sum + obs.weight * reserve.mul_add(-obs.x, obs.y), total + obs.weight)
            });
        if total <= 0.0 {
            return Err(AppError::insufficient_data(
                "no weighted points to re-estimate the threshold",
            ));
        }
        Ok(LinearFit {
            intercept: weighted_sum / total,
            slope: reserve,
        })
    }

    /// Time to exhaustion (seconds) at each configured intensity above threshold
    fn predictions(&self, threshold: f64, reserve_native: f64) -> BTreeMap<String, f64> {
        self.config
            .prediction_intensities
            .iter()
            .filter_map(|intensity| {
                let excess = threshold * (intensity - 1.0);
                if excess <= 0.0 || reserve_native <= 0.0 {
                    return None;
                }
                let seconds = reserve_native / excess;
                seconds
                    .is_finite()
                    .then(|| (format!("{:.0}%", intensity * 100.0), seconds))
            })
            .collect()
    }
}
