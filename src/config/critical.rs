// ABOUTME: Critical Power/W' and Critical Speed/D' model fitting configuration
// ABOUTME: Duration grid, bands, recency, HR penalty, robust reweighting and plausibility bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Two-Parameter Model Configuration
//!
//! The reserve (W' or D') is validated in *reporting* units: kilojoules for
//! W' and meters for D'. `reserve_scale` converts the fitted native reserve
//! (joules or meters) into reporting units.

use super::error::{require_ascending, require_positive, require_within, ConfigError};
use super::estimator::ConfidenceConfig;
use serde::{Deserialize, Serialize};
use threshold_core::constants::{critical_power, critical_speed, fitting, units};
use threshold_core::models::CriticalModelKind;

/// Named duration band used to spread points across the curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBand {
    /// Band name (short, medium, long)
    pub name: String,
    /// Inclusive lower bound (seconds)
    pub min_seconds: f64,
    /// Exclusive upper bound (seconds)
    pub max_seconds: f64,
    /// HR fraction expected for a maximal effort in this band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_hr_percent: Option<f64>,
}

impl DurationBand {
    fn new(name: &str, min_seconds: f64, max_seconds: f64, expected_hr_percent: f64) -> Self {
        Self {
            name: name.to_owned(),
            min_seconds,
            max_seconds,
            expected_hr_percent: Some(expected_hr_percent),
        }
    }

    /// Whether `duration_seconds` falls in `[min, max)`
    #[must_use]
    pub fn contains(&self, duration_seconds: f64) -> bool {
        duration_seconds >= self.min_seconds && duration_seconds < self.max_seconds
    }
}

/// Configuration for one two-parameter model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalModelConfig {
    /// Which model is fitted
    pub kind: CriticalModelKind,
    /// Mean-maximal duration grid (seconds), ascending
    pub duration_grid: Vec<f64>,
    /// Relative tolerance when matching efforts to grid durations
    pub grid_tolerance: f64,
    /// Duration bands; empty disables band restriction and band weighting
    #[serde(default)]
    pub bands: Vec<DurationBand>,
    /// Lookback (days)
    pub max_age_days: f64,
    /// Recency half-life (days)
    pub half_life_days: f64,
    /// Minimum distinct-duration points
    pub min_points: usize,
    /// Lowest multiplier the HR penalty can apply
    pub hr_penalty_floor: f64,
    /// HR shortfall (fraction) that drives the penalty to its floor
    pub hr_penalty_span: f64,
    /// Run the robust outlier pass
    pub robust_reweighting: bool,
    /// Outlier cutoff as a multiple of MAD
    pub huber_mad_multiplier: f64,
    /// R² below which the reserve is clamped
    pub r2_floor: f64,
    /// Plausible reserve lower bound (reporting units)
    pub reserve_min: f64,
    /// Plausible reserve upper bound (reporting units)
    pub reserve_max: f64,
    /// Native reserve to reporting units multiplier
    pub reserve_scale: f64,
    /// Intensities (fraction of threshold) to predict durations for
    pub prediction_intensities: Vec<f64>,
    /// Confidence scoring
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

impl CriticalModelConfig {
    /// Critical Power / W' (watts, kJ)
    #[must_use]
    pub fn critical_power() -> Self {
        Self {
            kind: CriticalModelKind::CriticalPower,
            duration_grid: critical_power::DURATION_GRID.to_vec(),
            grid_tolerance: fitting::GRID_TOLERANCE,
            bands: vec![
                DurationBand::new("short", 50.0, 300.0, 0.85),
                DurationBand::new("medium", 300.0, 1200.0, 0.90),
                DurationBand::new("long", 1200.0, 4000.0, 0.88),
            ],
            max_age_days: critical_power::MAX_AGE_DAYS,
            half_life_days: critical_power::HALF_LIFE_DAYS,
            min_points: fitting::MIN_POINTS,
            hr_penalty_floor: fitting::HR_PENALTY_FLOOR,
            hr_penalty_span: fitting::HR_PENALTY_SPAN,
            robust_reweighting: true,
            huber_mad_multiplier: fitting::HUBER_MAD_MULTIPLIER,
            r2_floor: critical_power::R2_FLOOR,
            reserve_min: critical_power::RESERVE_MIN_KJ,
            reserve_max: critical_power::RESERVE_MAX_KJ,
            reserve_scale: 1.0 / units::JOULES_PER_KILOJOULE,
            prediction_intensities: fitting::PREDICTION_INTENSITIES.to_vec(),
            confidence: ConfidenceConfig::default(),
        }
    }

    /// Critical Speed / D' (m/s, meters)
    #[must_use]
    pub fn critical_speed() -> Self {
        Self {
            kind: CriticalModelKind::CriticalSpeed,
            duration_grid: critical_speed::DURATION_GRID.to_vec(),
            grid_tolerance: fitting::GRID_TOLERANCE,
            bands: vec![
                DurationBand::new("short", 100.0, 300.0, 0.88),
                DurationBand::new("medium", 300.0, 720.0, 0.92),
                DurationBand::new("long", 720.0, 2000.0, 0.90),
            ],
            max_age_days: critical_speed::MAX_AGE_DAYS,
            half_life_days: critical_speed::HALF_LIFE_DAYS,
            min_points: fitting::MIN_POINTS,
            hr_penalty_floor: fitting::HR_PENALTY_FLOOR,
            hr_penalty_span: fitting::HR_PENALTY_SPAN,
            robust_reweighting: true,
            huber_mad_multiplier: fitting::HUBER_MAD_MULTIPLIER,
            r2_floor: critical_speed::R2_FLOOR,
            reserve_min: critical_speed::RESERVE_MIN_M,
            reserve_max: critical_speed::RESERVE_MAX_M,
            reserve_scale: 1.0,
            prediction_intensities: fitting::PREDICTION_INTENSITIES.to_vec(),
            confidence: ConfidenceConfig::default(),
        }
    }

    /// Band containing `duration_seconds`, if bands are configured
    #[must_use]
    pub fn band_for(&self, duration_seconds: f64) -> Option<&DurationBand> {
        self.bands.iter().find(|band| band.contains(duration_seconds))
    }

    /// Validate grid, bands and bounds
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first violated precondition
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.kind.name();
        require_ascending(&self.duration_grid, &format!("{name}.duration_grid"))?;
        require_within(self.grid_tolerance, 0.0, 0.5, &format!("{name}.grid_tolerance"))?;
        for band in &self.bands {
            require_positive(band.max_seconds, &format!("{name}.bands.{}", band.name))?;
            if band.min_seconds < 0.0 || band.min_seconds >= band.max_seconds {
                return Err(ConfigError::InvalidRange(format!(
                    "{name}.bands.{}: min_seconds must be < max_seconds",
                    band.name
                )));
            }
            if let Some(expected) = band.expected_hr_percent {
                require_within(expected, 0.3, 1.2, &format!("{name}.bands.{}", band.name))?;
            }
        }
        require_positive(self.max_age_days, &format!("{name}.max_age_days"))?;
        require_positive(self.half_life_days, &format!("{name}.half_life_days"))?;
        if self.min_points < 2 {
            return Err(ConfigError::ValueOutOfRange(format!(
                "{name}.min_points must be at least 2"
            )));
        }
        require_within(self.hr_penalty_floor, 0.0, 1.0, &format!("{name}.hr_penalty_floor"))?;
        require_positive(self.hr_penalty_span, &format!("{name}.hr_penalty_span"))?;
        require_positive(
            self.huber_mad_multiplier,
            &format!("{name}.huber_mad_multiplier"),
        )?;
        require_within(self.r2_floor, 0.0, 1.0, &format!("{name}.r2_floor"))?;
        require_positive(self.reserve_min, &format!("{name}.reserve_min"))?;
        require_positive(self.reserve_max, &format!("{name}.reserve_max"))?;
        if self.reserve_min >= self.reserve_max {
            return Err(ConfigError::InvalidRange(format!(
                "{name}: reserve_min must be < reserve_max"
            )));
        }
        require_positive(self.reserve_scale, &format!("{name}.reserve_scale"))?;
        for intensity in &self.prediction_intensities {
            require_positive(*intensity, &format!("{name}.prediction_intensities"))?;
        }
        self.confidence.validate()
    }
}
