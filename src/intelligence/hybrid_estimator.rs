// ABOUTME: FTP-Hybrid estimator combining normalized power across 15-40 minute windows
// ABOUTME: Rejects poor-quality efforts with reasons, uplifts sub-maximal ones, weights longer windows more
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! FTP-Hybrid Estimation
//!
//! Per effort: `FTP_est = NP x duration_factor x hr_correction`. The best
//! surviving estimate per window is kept, and the final FTP is the mean of the
//! per-window estimates weighted by the window weights.

use super::algorithms::{confidence_percent, normalized_power, weighted_mean, weighted_std_dev};
use crate::config::{HybridConfig, HybridWindow};
use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;
use threshold_core::models::{
    AthleteContext, EffortContribution, HybridEffort, MetricKind, MetricMetadata, RejectedEffort,
    ThresholdMetric, WeightedPoint,
};
use tracing::debug;

/// Heart rate drift between the first and second half of `samples` (percent)
///
/// Returns `None` with fewer than two samples or a non-positive first half.
#[must_use]
pub fn heart_rate_drift_percent(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let (first, second) = samples.split_at(samples.len() / 2);
    let first_mean = first.iter().sum::<f64>() / first.len() as f64;
    let second_mean = second.iter().sum::<f64>() / second.len() as f64;
    if first_mean <= 0.0 {
        return None;
    }
    Some((second_mean - first_mean) / first_mean * 100.0).filter(|drift| drift.is_finite())
}

/// A per-effort FTP estimate that passed every gate
#[derive(Debug, Clone)]
struct WindowEstimate<'a> {
    window: HybridWindow,
    value: f64,
    effort: &'a HybridEffort,
}

/// Multi-window FTP estimator
#[derive(Debug, Clone)]
pub struct HybridEstimator {
    config: HybridConfig,
}

impl HybridEstimator {
    /// Create an estimator from a validated configuration
    #[must_use]
    pub const fn new(config: HybridConfig) -> Self {
        Self { config }
    }

    /// Score one effort, or explain why it is rejected
    fn evaluate<'a>(&self, effort: &'a HybridEffort) -> Result<WindowEstimate<'a>, String> {
        let cfg = &self.config;
        let window = *cfg
            .window(effort.window_minutes)
            .ok_or_else(|| format!("unknown window {} min", effort.window_minutes))?;

        if !effort.age_days.is_finite() || effort.age_days > cfg.max_age_days {
            return Err(format!("older than {} days", cfg.max_age_days));
        }

        let heart_rate = effort.heart_rate_percent.filter(|hr| hr.is_finite());
        match heart_rate {
            None if cfg.require_heart_rate => return Err("missing heart rate".to_owned()),
            Some(hr) if hr < cfg.min_hr_percent => {
                return Err(format!(
                    "heart rate {:.0}% below minimum {:.0}%",
                    hr * 100.0,
                    cfg.min_hr_percent * 100.0
                ));
            }
            _ => {}
        }

        let drift = effort
            .heart_rate_drift_percent
            .or_else(|| heart_rate_drift_percent(&effort.heart_rate_samples));
        if let Some(drift) = drift.filter(|drift| drift.abs() > cfg.max_hr_drift_percent) {
            return Err(format!(
                "heart rate drift {drift:.1}% exceeds ±{:.1}%",
                cfg.max_hr_drift_percent
            ));
        }

        let np = normalized_power(
            &effort.power_samples,
            effort.sample_interval_seconds,
            cfg.smoothing_window_seconds,
        )
        .map_err(|e| format!("normalized power unavailable: {}", e.message))?;

        let hr_correction = match heart_rate {
            Some(hr) if hr < cfg.uplift_hr_percent => {
                (cfg.uplift_target_hr_percent / hr).min(cfg.max_uplift)
            }
            _ => 1.0,
        };

        Ok(WindowEstimate {
            window,
            value: np * window.duration_factor * hr_correction,
            effort,
        })
    }

    /// Estimate FTP from window efforts
    ///
    /// Returns `Ok(None)` when every effort is rejected.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteResult` if the combined estimate is not finite
    pub fn estimate(
        &self,
        efforts: &[HybridEffort],
        athlete: &AthleteContext,
    ) -> AppResult<Option<ThresholdMetric>> {
        let mut rejected = Vec::new();
        let mut best: BTreeMap<u32, WindowEstimate<'_>> = BTreeMap::new();

        for effort in efforts {
            match self.evaluate(effort) {
                Ok(estimate) => {
                    let minutes = estimate.window.minutes;
                    if best
                        .get(&minutes)
                        .is_none_or(|current| estimate.value > current.value)
                    {
                        best.insert(minutes, estimate);
                    }
                }
                Err(reason) => {
                    debug!(
                        session_id = %effort.session_id,
                        window_minutes = effort.window_minutes,
                        reason = %reason,
                        "FTP-Hybrid effort rejected"
                    );
                    rejected.push(RejectedEffort {
                        session_id: effort.session_id.clone(),
                        window_minutes: Some(effort.window_minutes),
                        reason,
                    });
                }
            }
        }

        if best.is_empty() {
            debug!(
                efforts = efforts.len(),
                rejected = rejected.len(),
                "No FTP-Hybrid window survived"
            );
            return Ok(None);
        }

        let points: Vec<WeightedPoint> = best
            .values()
            .map(|estimate| WeightedPoint::new(estimate.value, estimate.window.weight))
            .collect();
        let value = AppError::ensure_finite(weighted_mean(&points)?, "FTP-Hybrid")?;
        let std_dev = weighted_std_dev(&points)?;

        let windows_used: Vec<u32> = best.keys().copied().collect();
        let mean_age =
            best.values().map(|e| e.effort.age_days).sum::<f64>() / best.len() as f64;
        let cv = if value > 0.0 { std_dev / value } else { 0.0 };
        let confidence = confidence_percent(
            best.len(),
            cv,
            mean_age,
            self.config.half_life_days,
            &self.config.confidence,
        );

        let contributors: Vec<EffortContribution> = best
            .values()
            .map(|estimate| EffortContribution {
                effort: estimate.effort.as_candidate(estimate.value),
                weight: estimate.window.weight,
            })
            .collect();

        debug!(
            value = value,
            windows = ?windows_used,
            rejected = rejected.len(),
            confidence = confidence,
            "FTP-Hybrid estimated"
        );

        Ok(Some(ThresholdMetric {
            kind: MetricKind::FtpHybrid,
            value,
            confidence_percent: confidence,
            standard_deviation: Some(std_dev),
            metadata: MetricMetadata {
                candidates_count: efforts.len(),
                used_count: contributors.len(),
                method: Some("multi_window".to_owned()),
                windows_used,
                rejected,
                ..MetricMetadata::default()
            },
            contributors,
            per_kg: athlete.per_kg(value),
        }))
    }
}
