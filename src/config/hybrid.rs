// ABOUTME: FTP-Hybrid configuration: duration windows, factors, weights and HR quality gates
// ABOUTME: Defaults reproduce the 15-40 minute window ladder with sub-maximal uplift
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::error::{require_positive, require_within, ConfigError};
use super::estimator::ConfidenceConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use threshold_core::constants::{ftp, hybrid, normalized_power};

/// One FTP-Hybrid duration window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWindow {
    /// Window length (minutes)
    pub minutes: u32,
    /// Power-duration factor converting window NP to FTP
    pub duration_factor: f64,
    /// Evidence weight of this window in the final mean
    pub weight: f64,
}

/// FTP-Hybrid estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Duration windows, shortest first
    pub windows: Vec<HybridWindow>,
    /// Efforts below this HR fraction are rejected
    pub min_hr_percent: f64,
    /// Efforts below this HR fraction receive the uplift
    pub uplift_hr_percent: f64,
    /// HR fraction the uplift normalises towards
    pub uplift_target_hr_percent: f64,
    /// Maximum uplift multiplier
    pub max_uplift: f64,
    /// Maximum HR drift (percent) before the effort is rejected
    pub max_hr_drift_percent: f64,
    /// Lookback (days)
    pub max_age_days: f64,
    /// Reject efforts without heart rate data
    pub require_heart_rate: bool,
    /// Normalized power rolling window (seconds)
    pub smoothing_window_seconds: f64,
    /// Half-life used for the recency part of confidence (days)
    pub half_life_days: f64,
    /// Confidence scoring
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        let windows = hybrid::WINDOW_MINUTES
            .iter()
            .zip(hybrid::DURATION_FACTORS)
            .zip(hybrid::WINDOW_WEIGHTS)
            .map(|((&minutes, duration_factor), weight)| HybridWindow {
                minutes,
                duration_factor,
                weight,
            })
            .collect();

        Self {
            windows,
            min_hr_percent: hybrid::MIN_HR_PERCENT,
            uplift_hr_percent: hybrid::UPLIFT_HR_PERCENT,
            uplift_target_hr_percent: hybrid::UPLIFT_HR_PERCENT,
            max_uplift: hybrid::MAX_UPLIFT,
            max_hr_drift_percent: hybrid::MAX_HR_DRIFT_PERCENT,
            max_age_days: hybrid::MAX_AGE_DAYS,
            require_heart_rate: true,
            smoothing_window_seconds: normalized_power::SMOOTHING_WINDOW_SECONDS,
            half_life_days: ftp::HALF_LIFE_DAYS,
            confidence: ConfidenceConfig::default(),
        }
    }
}

impl HybridConfig {
    /// Look up the window configured for `minutes`
    #[must_use]
    pub fn window(&self, minutes: u32) -> Option<&HybridWindow> {
        self.windows.iter().find(|window| window.minutes == minutes)
    }

    /// Validate windows and HR gates
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on duplicate windows, out-of-range factors or
    /// inconsistent HR thresholds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windows.is_empty() {
            return Err(ConfigError::InvalidRange(
                "ftp_hybrid.windows must not be empty".to_owned(),
            ));
        }
        let mut seen = HashSet::new();
        for window in &self.windows {
            if window.minutes == 0 || !seen.insert(window.minutes) {
                return Err(ConfigError::InvalidRange(format!(
                    "ftp_hybrid window {} min is zero or duplicated",
                    window.minutes
                )));
            }
            require_within(
                window.duration_factor,
                0.5,
                1.2,
                "ftp_hybrid.duration_factor",
            )?;
            require_positive(window.weight, "ftp_hybrid.weight")?;
        }
        require_within(self.min_hr_percent, 0.0, 1.0, "ftp_hybrid.min_hr_percent")?;
        require_within(
            self.uplift_hr_percent,
            0.0,
            1.0,
            "ftp_hybrid.uplift_hr_percent",
        )?;
        if self.min_hr_percent > self.uplift_hr_percent {
            return Err(ConfigError::InvalidRange(
                "ftp_hybrid.min_hr_percent must be <= uplift_hr_percent".to_owned(),
            ));
        }
        require_within(
            self.uplift_target_hr_percent,
            0.3,
            1.2,
            "ftp_hybrid.uplift_target_hr_percent",
        )?;
        require_within(self.max_uplift, 1.0, 1.5, "ftp_hybrid.max_uplift")?;
        require_positive(self.max_hr_drift_percent, "ftp_hybrid.max_hr_drift_percent")?;
        require_positive(self.max_age_days, "ftp_hybrid.max_age_days")?;
        require_positive(
            self.smoothing_window_seconds,
            "ftp_hybrid.smoothing_window_seconds",
        )?;
        require_positive(self.half_life_days, "ftp_hybrid.half_life_days")?;
        self.confidence.validate()
    }
}
