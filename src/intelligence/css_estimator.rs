// ABOUTME: Critical swim speed from best efforts, paired time trials, or distance/time regression
// ABOUTME: Methods run in priority order; every outcome is kept with its value or reason
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! CSS Estimation
//!
//! - `BestEfforts`: the single-threshold pipeline on 8-30 minute swims
//! - `TimeTrials`: `CSS = (D2 - D1) / (T2 - T1)` from the best short and long trial
//! - `Regression`: `distance = CSS x time + anaerobic_distance`
//!
//! The first method that yields a value becomes the primary metric.

use super::algorithms::{confidence_percent, fit_statistics, scaled_confidence};
use super::algorithms::{weighted_least_squares, Observation};
use super::threshold_estimator::ThresholdEstimator;
use crate::config::{CssConfig, DurationWindow};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use threshold_core::models::{
    EffortCandidate, EffortContribution, MetricKind, MetricMetadata, ThresholdMetric,
};
use tracing::debug;

/// CSS estimation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CssMethod {
    /// Weighted quantile of recent threshold-length swims
    BestEfforts,
    /// Paired short and long time trials
    TimeTrials,
    /// Least-squares distance/time regression
    Regression,
}

impl CssMethod {
    /// Methods in priority order
    pub const PRIORITY: [Self; 3] = [Self::BestEfforts, Self::TimeTrials, Self::Regression];

    /// Get method name for logging and reporting
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BestEfforts => "best_efforts",
            Self::TimeTrials => "time_trials",
            Self::Regression => "regression",
        }
    }
}

impl fmt::Display for CssMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CssMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best_efforts" => Ok(Self::BestEfforts),
            "time_trials" | "time_trial" => Ok(Self::TimeTrials),
            "regression" => Ok(Self::Regression),
            other => Err(AppError::invalid_parameter(format!(
                "Unknown CSS method: '{other}'. Valid options: best_efforts, time_trials, regression"
            ))),
        }
    }
}

/// Result of one CSS method: a value or the reason it is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssMethodOutcome {
    /// Method
    pub method: CssMethod,
    /// CSS (m/s), when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Confidence of this method's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_percent: Option<u8>,
    /// Why no value was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CssMethodOutcome {
    fn available(metric: &ThresholdMetric, method: CssMethod) -> Self {
        Self {
            method,
            value: Some(metric.value),
            confidence_percent: Some(metric.confidence_percent),
            reason: None,
        }
    }

    fn unavailable(method: CssMethod, reason: impl Into<String>) -> Self {
        Self {
            method,
            value: None,
            confidence_percent: None,
            reason: Some(reason.into()),
        }
    }
}

/// CSS estimate with the primary metric and every method's outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssEstimate {
    /// First available method's metric
    pub primary: Option<ThresholdMetric>,
    /// Outcomes in priority order
    pub methods: Vec<CssMethodOutcome>,
}

/// Multi-method CSS estimator
#[derive(Debug, Clone)]
pub struct CssEstimator {
    config: CssConfig,
    best_efforts: ThresholdEstimator,
}

impl CssEstimator {
    /// Create an estimator from a validated CSS configuration
    #[must_use]
    pub fn new(config: CssConfig) -> Self {
        let best_efforts = ThresholdEstimator::new(config.best_efforts.clone());
        Self {
            config,
            best_efforts,
        }
    }

    /// Run every method and pick the primary result
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for configuration errors; data shortfalls
    /// are reported as method reasons instead
    pub fn estimate(&self, candidates: &[EffortCandidate]) -> AppResult<CssEstimate> {
        let mut primary: Option<ThresholdMetric> = None;
        let mut methods = Vec::with_capacity(CssMethod::PRIORITY.len());

        for method in CssMethod::PRIORITY {
            let result = match method {
                CssMethod::BestEfforts => self.best_efforts.estimate(candidates),
                CssMethod::TimeTrials => self.time_trials(candidates),
                CssMethod::Regression => self.regression(candidates),
            };
            let outcome = match result {
                Ok(Some(mut metric)) => {
                    metric.metadata.method = Some(method.name().to_owned());
                    let outcome = CssMethodOutcome::available(&metric, method);
                    if primary.is_none() {
                        primary = Some(metric);
                    }
                    outcome
                }
                Ok(None) => CssMethodOutcome::unavailable(method, self.reason_for(method)),
                Err(e) if e.is_recoverable() => CssMethodOutcome::unavailable(method, e.message),
                Err(e) => return Err(e),
            };
            debug!(
                method = %method,
                value = ?outcome.value,
                reason = ?outcome.reason,
                "CSS method evaluated"
            );
            methods.push(outcome);
        }

        Ok(CssEstimate { primary, methods })
    }

    fn reason_for(&self, method: CssMethod) -> String {
        match method {
            CssMethod::BestEfforts | CssMethod::TimeTrials => "insufficient efforts".to_owned(),
            CssMethod::Regression => format!(
                "minimum {} points required",
                self.config.regression_min_points
            ),
        }
    }

    fn within_lookback<'a>(
        &self,
        candidates: &'a [EffortCandidate],
        window: &'a DurationWindow,
    ) -> impl Iterator<Item = &'a EffortCandidate> + 'a {
        let max_age = self.config.best_efforts.max_age_days;
        candidates.iter().filter(move |candidate| {
            candidate.magnitude.is_finite()
                && candidate.magnitude > 0.0
                && window.contains(candidate.duration_seconds)
                && candidate.age_days <= max_age
        })
    }

    fn fastest<'a>(
        &self,
        candidates: &'a [EffortCandidate],
        window: &'a DurationWindow,
    ) -> Option<&'a EffortCandidate> {
        self.within_lookback(candidates, window)
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }

    fn metric(
        value: f64,
        confidence: u8,
        contributors: Vec<EffortContribution>,
        candidates_count: usize,
    ) -> ThresholdMetric {
        ThresholdMetric {
            kind: MetricKind::Css,
            value,
            confidence_percent: confidence,
            standard_deviation: None,
            metadata: MetricMetadata {
                candidates_count,
                used_count: contributors.len(),
                raw_value: Some(value),
                ..MetricMetadata::default()
            },
            contributors,
            per_kg: None,
        }
    }

    /// CSS from the fastest short and long time trial
    fn time_trials(&self, candidates: &[EffortCandidate]) -> AppResult<Option<ThresholdMetric>> {
        let (Some(short), Some(long)) = (
            self.fastest(candidates, &self.config.short_trial),
            self.fastest(candidates, &self.config.long_trial),
        ) else {
            return Ok(None);
        };

        let short_distance = short.magnitude * short.duration_seconds;
        let long_distance = long.magnitude * long.duration_seconds;
        let css =
            (long_distance - short_distance) / (long.duration_seconds - short.duration_seconds);
        let css = AppError::ensure_finite(css, "time-trial CSS")?;
        if css <= 0.0 {
            return Err(AppError::insufficient_data(
                "time trials give a non-positive CSS",
            ));
        }

        let cfg = &self.config.best_efforts;
        let mean_age = f64::midpoint(short.age_days, long.age_days);
        let confidence =
            confidence_percent(2, 0.0, mean_age, cfg.half_life_days, &cfg.confidence);
        let candidates_count = self
            .within_lookback(candidates, &self.config.short_trial)
            .chain(self.within_lookback(candidates, &self.config.long_trial))
            .count();
        let contributors = [short, long]
            .into_iter()
            .map(|effort| EffortContribution {
                effort: effort.clone(),
                weight: 1.0,
            })
            .collect();

        Ok(Some(Self::metric(
            css,
            confidence,
            contributors,
            candidates_count,
        )))
    }

    /// CSS as the slope of distance over time
    fn regression(&self, candidates: &[EffortCandidate]) -> AppResult<Option<ThresholdMetric>> {
        let eligible: Vec<&EffortCandidate> = self
            .within_lookback(candidates, &self.config.regression)
            .collect();
        let distinct_durations: HashSet<u64> = eligible
            .iter()
            .map(|candidate| candidate.duration_seconds.to_bits())
            .collect();
        if eligible.len() < self.config.regression_min_points || distinct_durations.len() < 2 {
            return Ok(None);
        }

        let observations: Vec<Observation> = eligible
            .iter()
            .map(|c| Observation::new(c.duration_seconds, c.magnitude * c.duration_seconds, 1.0))
            .collect();
        let fit = weighted_least_squares(&observations)?;
        if fit.slope <= 0.0 {
            return Err(AppError::insufficient_data(
                "regression gives a non-positive CSS",
            ));
        }
        let stats = fit_statistics(&observations, &fit);

        let cfg = &self.config.best_efforts;
        let mean_age =
            eligible.iter().map(|c| c.age_days).sum::<f64>() / eligible.len() as f64;
        let base = confidence_percent(
            eligible.len(),
            0.0,
            mean_age,
            cfg.half_life_days,
            &cfg.confidence,
        );
        let contributors = eligible
            .iter()
            .map(|effort| EffortContribution {
                effort: (*effort).clone(),
                weight: 1.0,
            })
            .collect();

        debug!(
            css = fit.slope,
            anaerobic_distance = fit.intercept,
            r2 = stats.r2,
            "CSS regression fitted"
        );
        Ok(Some(Self::metric(
            fit.slope,
            scaled_confidence(base, stats.r2),
            contributors,
            eligible.len(),
        )))
    }
}
