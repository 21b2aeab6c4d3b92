// ABOUTME: Single-threshold estimator shared by VMA, FTP and CSS best efforts
// ABOUTME: Filter, top-N, quality x decay weighting, weighted quantile, correction, confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Single-Threshold Estimation
//!
//! One pipeline serves every single-value metric. The metric-specific parts
//! come from [`ThresholdConfig`]:
//!
//! 1. keep candidates inside the duration window and lookback
//! 2. keep the `top_n` strongest by magnitude
//! 3. weight each by `quality x decay`
//! 4. aggregate with a weighted quantile
//! 5. apply the configured [`Correction`]
//! 6. score confidence from count, dispersion and recency

use super::algorithms::{
    confidence_percent, decay_weight, quality_weight, weighted_mean, weighted_quantile,
    weighted_std_dev,
};
use crate::config::{Correction, ThresholdConfig};
use crate::errors::{AppError, AppResult};
use threshold_core::models::{
    EffortCandidate, EffortContribution, MetricMetadata, ThresholdMetric, WeightedPoint,
};
use tracing::debug;

/// Estimator for one single-value threshold metric
#[derive(Debug, Clone)]
pub struct ThresholdEstimator {
    config: ThresholdConfig,
}

impl ThresholdEstimator {
    /// Create an estimator from a validated metric configuration
    #[must_use]
    pub const fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    /// Configuration driving this estimator
    #[must_use]
    pub const fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Candidates passing the duration window and lookback filters
    #[must_use]
    pub fn eligible<'a>(&self, candidates: &'a [EffortCandidate]) -> Vec<&'a EffortCandidate> {
        candidates
            .iter()
            .filter(|candidate| {
                candidate.magnitude.is_finite()
                    && candidate.magnitude > 0.0
                    && self.config.window.contains(candidate.duration_seconds)
                    && candidate.age_days.is_finite()
                    && candidate.age_days <= self.config.max_age_days
            })
            .collect()
    }

    /// Estimate the metric from `candidates`
    ///
    /// Returns `Ok(None)` when no candidate qualifies.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if every retained candidate has zero weight
    /// - `NonFiniteResult` if the aggregate is not finite
    /// - `InvalidParameter` if the configuration is invalid
    pub fn estimate(&self, candidates: &[EffortCandidate]) -> AppResult<Option<ThresholdMetric>> {
        let kind = self.config.kind;
        let mut eligible = self.eligible(candidates);
        let candidates_count = eligible.len();
        if eligible.is_empty() {
            debug!(metric = %kind, total = candidates.len(), "No qualifying efforts");
            return Ok(None);
        }

        // Stable sort keeps input order among equal magnitudes
        eligible.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
        eligible.truncate(self.config.top_n);

        let mut contributions = Vec::with_capacity(eligible.len());
        for candidate in eligible {
            let quality = quality_weight(candidate, &self.config.quality);
            let decay = decay_weight(
                candidate.age_days,
                self.config.half_life_days,
                Some(self.config.max_age_days),
            )?;
            contributions.push(EffortContribution {
                effort: candidate.clone(),
                weight: quality * decay,
            });
        }

        let points: Vec<WeightedPoint> = contributions
            .iter()
            .map(|c| WeightedPoint::new(c.effort.magnitude, c.weight))
            .collect();
        let raw = weighted_quantile(&points, self.config.quantile)?;
        let mean = weighted_mean(&points)?;
        let std_dev = weighted_std_dev(&points)?;

        let mut metadata = MetricMetadata {
            candidates_count,
            raw_value: Some(raw),
            ..MetricMetadata::default()
        };
        let value = self.apply_correction(raw, &contributions, &mut metadata);
        let value = AppError::ensure_finite(value, kind.name())?;

        contributions.retain(|c| c.weight > 0.0);
        metadata.used_count = contributions.len();

        let mean_age = contributions.iter().map(|c| c.effort.age_days).sum::<f64>()
            / contributions.len() as f64;
        let cv = if mean.abs() > f64::EPSILON {
            std_dev / mean.abs()
        } else {
            0.0
        };
        let confidence = confidence_percent(
            contributions.len(),
            cv,
            mean_age,
            self.config.half_life_days,
            &self.config.confidence,
        );

        debug!(
            metric = %kind,
            candidates = candidates_count,
            used = metadata.used_count,
            raw_value = raw,
            value = value,
            confidence = confidence,
            "Threshold estimated"
        );

        Ok(Some(ThresholdMetric {
            kind,
            value,
            confidence_percent: confidence,
            standard_deviation: Some(std_dev),
            contributors: contributions,
            metadata,
            per_kg: None,
        }))
    }

    /// Apply the configured post-aggregation correction, recording it in `metadata`
    fn apply_correction(
        &self,
        raw: f64,
        contributions: &[EffortContribution],
        metadata: &mut MetricMetadata,
    ) -> f64 {
        match self.config.correction {
            Correction::None => raw,
            Correction::HeartRateDelta { sensitivity, cap } => {
                let hr_points: Vec<WeightedPoint> = contributions
                    .iter()
                    .filter_map(|c| {
                        c.effort
                            .heart_rate_percent
                            .map(|hr| WeightedPoint::new(hr, c.weight))
                    })
                    .collect();
                // No usable HR: leave the aggregate untouched
                let Ok(observed) = weighted_mean(&hr_points) else {
                    return raw;
                };
                let correction = ((self.config.quality.target_hr_percent - observed)
                    * sensitivity)
                    .clamp(-cap, cap);
                metadata.heart_rate_correction = Some(correction);
                raw + correction
            }
            Correction::Drift { percent } => {
                metadata.drift_applied = true;
                metadata.drift_percent = Some(percent);
                raw * (1.0 + percent / 100.0)
            }
        }
    }
}
