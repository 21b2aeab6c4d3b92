// ABOUTME: Configuration records for single-threshold estimators (VMA, FTP, CSS)
// ABOUTME: Duration windows, quality policy, per-metric corrections, and confidence weighting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Single-Threshold Estimator Configuration
//!
//! VMA, FTP and CSS share one pipeline. Everything that differs between them
//! (duration window, lookback, target intensity, correction step) lives in a
//! [`ThresholdConfig`] record so the pipeline itself never branches on the
//! metric kind.

use super::error::{require_positive, require_within, ConfigError};
use serde::{Deserialize, Serialize};
use threshold_core::constants::{confidence, css, estimator, ftp, quality, vma};
use threshold_core::models::MetricKind;

/// Inclusive effort duration window in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationWindow {
    /// Shortest qualifying duration
    pub min_seconds: f64,
    /// Longest qualifying duration
    pub max_seconds: f64,
}

impl DurationWindow {
    /// Create a window from a `(min, max)` pair
    #[must_use]
    pub const fn new(min_seconds: f64, max_seconds: f64) -> Self {
        Self {
            min_seconds,
            max_seconds,
        }
    }

    /// Whether `duration_seconds` falls inside the window
    #[must_use]
    pub fn contains(&self, duration_seconds: f64) -> bool {
        (self.min_seconds..=self.max_seconds).contains(&duration_seconds)
    }

    /// Validate bounds
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a bound is non-positive or min >= max
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        require_positive(self.min_seconds, name)?;
        require_positive(self.max_seconds, name)?;
        if self.min_seconds >= self.max_seconds {
            return Err(ConfigError::InvalidRange(format!(
                "{name}: min_seconds must be < max_seconds"
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for DurationWindow {
    fn from((min_seconds, max_seconds): (f64, f64)) -> Self {
        Self::new(min_seconds, max_seconds)
    }
}

/// How an effort's execution quality is scored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityPolicy {
    /// Heart rate fraction the protocol is meant to be executed at
    pub target_hr_percent: f64,
    /// Gaussian tolerance around the target
    pub hr_tolerance: f64,
    /// Coefficient of variation at which the stability term reaches zero
    pub stability_threshold: f64,
    /// Efforts without HR get zero weight instead of a neutral one
    #[serde(default)]
    pub require_heart_rate: bool,
}

impl QualityPolicy {
    /// Policy targeting `target_hr_percent` with default tolerances
    #[must_use]
    pub const fn targeting(target_hr_percent: f64) -> Self {
        Self {
            target_hr_percent,
            hr_tolerance: quality::HR_TOLERANCE,
            stability_threshold: quality::STABILITY_THRESHOLD,
            require_heart_rate: false,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        require_within(self.target_hr_percent, 0.3, 1.2, name)?;
        require_positive(self.hr_tolerance, name)?;
        require_positive(self.stability_threshold, name)
    }
}

/// Confidence scoring weights and scales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Candidate count at which the count score reaches ~63%
    pub count_scale: f64,
    /// Coefficient of variation at which the dispersion score halves
    pub cv_reference: f64,
    /// Weight of the count score
    pub count_weight: f64,
    /// Weight of the dispersion score
    pub dispersion_weight: f64,
    /// Weight of the recency score
    pub recency_weight: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            count_scale: confidence::COUNT_SCALE,
            cv_reference: confidence::CV_REFERENCE,
            count_weight: confidence::COUNT_WEIGHT,
            dispersion_weight: confidence::DISPERSION_WEIGHT,
            recency_weight: confidence::RECENCY_WEIGHT,
        }
    }
}

impl ConfidenceConfig {
    /// Validate scales and weights
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a scale is non-positive or weights do not sum to 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(self.count_scale, "confidence.count_scale")?;
        require_positive(self.cv_reference, "confidence.cv_reference")?;
        for weight in [
            self.count_weight,
            self.dispersion_weight,
            self.recency_weight,
        ] {
            require_within(weight, 0.0, 1.0, "confidence weight")?;
        }
        let sum = self.count_weight + self.dispersion_weight + self.recency_weight;
        if (sum - 1.0).abs() > 0.01 {
            return Err(ConfigError::InvalidWeights(format!(
                "confidence weights must sum to 1.0, got {sum:.3}"
            )));
        }
        Ok(())
    }
}

/// Metric-specific adjustment applied after aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Correction {
    /// No adjustment
    None,
    /// Additive correction `(target - observed HR) x sensitivity`, clamped to `±cap`
    HeartRateDelta {
        /// Value units per unit of HR fraction
        sensitivity: f64,
        /// Maximum absolute correction
        cap: f64,
    },
    /// Multiplicative drift `x (1 + percent / 100)`
    Drift {
        /// Upward adjustment in percent
        percent: f64,
    },
}

/// Configuration for one single-threshold metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Metric produced by this configuration
    pub kind: MetricKind,
    /// Qualifying effort durations
    pub window: DurationWindow,
    /// Lookback (days); older efforts are excluded
    pub max_age_days: f64,
    /// Maximum efforts kept after ranking by magnitude
    pub top_n: usize,
    /// Recency half-life (days)
    pub half_life_days: f64,
    /// Aggregation quantile in [0, 1]
    pub quantile: f64,
    /// Effort quality scoring
    pub quality: QualityPolicy,
    /// Post-aggregation adjustment
    pub correction: Correction,
    /// Confidence scoring
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

impl ThresholdConfig {
    /// VMA from ~6-minute running efforts (km/h)
    #[must_use]
    pub fn vma() -> Self {
        Self {
            kind: MetricKind::Vma,
            window: DurationWindow::new(vma::WINDOW_MIN_SECONDS, vma::WINDOW_MAX_SECONDS),
            max_age_days: vma::MAX_AGE_DAYS,
            top_n: estimator::TOP_N,
            half_life_days: vma::HALF_LIFE_DAYS,
            quantile: estimator::QUANTILE,
            quality: QualityPolicy::targeting(vma::TARGET_HR_PERCENT),
            correction: Correction::HeartRateDelta {
                sensitivity: vma::HR_SENSITIVITY_KMH,
                cap: vma::HR_CORRECTION_CAP_KMH,
            },
            confidence: ConfidenceConfig::default(),
        }
    }

    /// FTP from ~20-minute cycling efforts (W)
    #[must_use]
    pub fn ftp() -> Self {
        Self {
            kind: MetricKind::Ftp,
            window: DurationWindow::new(ftp::WINDOW_MIN_SECONDS, ftp::WINDOW_MAX_SECONDS),
            max_age_days: ftp::MAX_AGE_DAYS,
            top_n: estimator::TOP_N,
            half_life_days: ftp::HALF_LIFE_DAYS,
            quantile: estimator::QUANTILE,
            quality: QualityPolicy::targeting(ftp::TARGET_HR_PERCENT),
            correction: Correction::Drift {
                percent: ftp::DRIFT_PERCENT,
            },
            confidence: ConfidenceConfig::default(),
        }
    }

    /// CSS best-efforts variant (m/s)
    #[must_use]
    pub fn css() -> Self {
        Self {
            kind: MetricKind::Css,
            window: DurationWindow::new(css::WINDOW_MIN_SECONDS, css::WINDOW_MAX_SECONDS),
            max_age_days: css::MAX_AGE_DAYS,
            top_n: estimator::TOP_N,
            half_life_days: css::HALF_LIFE_DAYS,
            quantile: estimator::QUANTILE,
            quality: QualityPolicy::targeting(css::TARGET_HR_PERCENT),
            correction: Correction::None,
            confidence: ConfidenceConfig::default(),
        }
    }

    /// Validate every parameter of this metric's pipeline
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first violated precondition
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.kind.name();
        self.window.validate(name)?;
        require_positive(self.max_age_days, &format!("{name}.max_age_days"))?;
        require_positive(self.half_life_days, &format!("{name}.half_life_days"))?;
        require_within(self.quantile, 0.0, 1.0, &format!("{name}.quantile"))?;
        if self.top_n == 0 {
            return Err(ConfigError::ValueOutOfRange(format!(
                "{name}.top_n must be at least 1"
            )));
        }
        self.quality.validate(&format!("{name}.quality"))?;
        self.confidence.validate()?;
        match self.correction {
            Correction::None => Ok(()),
            Correction::HeartRateDelta { sensitivity, cap } => {
                require_within(sensitivity, 0.0, f64::MAX, &format!("{name}.sensitivity"))?;
                require_within(cap, 0.0, f64::MAX, &format!("{name}.cap"))
            }
            Correction::Drift { percent } => {
                require_within(percent, -50.0, 50.0, &format!("{name}.drift_percent"))
            }
        }
    }
}

/// Configuration for the CSS multi-method estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssConfig {
    /// Best-efforts (quantile) pipeline
    pub best_efforts: ThresholdConfig,
    /// Short time-trial band
    pub short_trial: DurationWindow,
    /// Long time-trial band
    pub long_trial: DurationWindow,
    /// Durations eligible for the distance/time regression
    pub regression: DurationWindow,
    /// Minimum efforts for the regression
    pub regression_min_points: usize,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            best_efforts: ThresholdConfig::css(),
            short_trial: css::SHORT_TRIAL_SECONDS.into(),
            long_trial: css::LONG_TRIAL_SECONDS.into(),
            regression: css::REGRESSION_SECONDS.into(),
            regression_min_points: css::REGRESSION_MIN_POINTS,
        }
    }
}

impl CssConfig {
    /// Validate all CSS methods
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any window is malformed or trial bands overlap
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.best_efforts.validate()?;
        self.short_trial.validate("css.short_trial")?;
        self.long_trial.validate("css.long_trial")?;
        self.regression.validate("css.regression")?;
        if self.short_trial.max_seconds >= self.long_trial.min_seconds {
            return Err(ConfigError::InvalidRange(
                "css.short_trial must end before css.long_trial starts".to_owned(),
            ));
        }
        if self.regression_min_points < 3 {
            return Err(ConfigError::ValueOutOfRange(
                "css.regression_min_points must be at least 3".to_owned(),
            ));
        }
        Ok(())
    }
}
