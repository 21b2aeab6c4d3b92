// ABOUTME: Top-level engine configuration with typestate validation and environment overrides
// ABOUTME: Only EngineConfig<true> can be handed to the PerformanceEngine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine Configuration
//!
//! Configuration is layered: compiled-in defaults, an optional JSON file, then
//! `THRESHOLD_*` environment variables. The result is validated once and
//! becomes an `EngineConfig<true>`.

use super::critical::CriticalModelConfig;
use super::error::ConfigError;
use super::estimator::{Correction, CssConfig, ThresholdConfig};
use super::hybrid::HybridConfig;
use super::zones::ZonesConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Engine configuration; `VALIDATED` is `true` only after [`EngineConfig::validate`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig<const VALIDATED: bool = false> {
    /// VMA estimator
    #[serde(default = "ThresholdConfig::vma")]
    pub vma: ThresholdConfig,
    /// FTP estimator
    #[serde(default = "ThresholdConfig::ftp")]
    pub ftp: ThresholdConfig,
    /// CSS multi-method estimator
    #[serde(default)]
    pub css: CssConfig,
    /// FTP-Hybrid estimator
    #[serde(default)]
    pub ftp_hybrid: HybridConfig,
    /// Critical Power / W' fitter
    #[serde(default = "CriticalModelConfig::critical_power")]
    pub critical_power: CriticalModelConfig,
    /// Critical Speed / D' fitter
    #[serde(default = "CriticalModelConfig::critical_speed")]
    pub critical_speed: CriticalModelConfig,
    /// Training zone splits
    #[serde(default)]
    pub zones: ZonesConfig,
    #[serde(skip)]
    _phantom: PhantomData<()>,
}

impl<const VALIDATED: bool> Default for EngineConfig<VALIDATED> {
    fn default() -> Self {
        Self {
            vma: ThresholdConfig::vma(),
            ftp: ThresholdConfig::ftp(),
            css: CssConfig::default(),
            ftp_hybrid: HybridConfig::default(),
            critical_power: CriticalModelConfig::critical_power(),
            critical_speed: CriticalModelConfig::critical_speed(),
            zones: ZonesConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl EngineConfig<false> {
    /// Read an unvalidated configuration from a JSON file
    ///
    /// Missing sections fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` or `ConfigError::Json` if the file cannot be read or parsed
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "Loaded engine configuration file");
        Ok(config)
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}: {val}")))?;
            debug!(env_var = env_var_name, "Applied configuration override");
        }
        Ok(())
    }

    /// Apply `THRESHOLD_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if a variable is set but cannot be parsed
    pub fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // VMA
        Self::apply_env_var("THRESHOLD_VMA_MAX_AGE_DAYS", &mut self.vma.max_age_days)?;
        Self::apply_env_var("THRESHOLD_VMA_HALF_LIFE_DAYS", &mut self.vma.half_life_days)?;
        Self::apply_env_var(
            "THRESHOLD_VMA_TARGET_HR",
            &mut self.vma.quality.target_hr_percent,
        )?;
        Self::apply_env_var("THRESHOLD_VMA_QUANTILE", &mut self.vma.quantile)?;
        Self::apply_env_var("THRESHOLD_VMA_TOP_N", &mut self.vma.top_n)?;
        if let Correction::HeartRateDelta {
            ref mut sensitivity,
            ref mut cap,
        } = self.vma.correction
        {
            Self::apply_env_var("THRESHOLD_VMA_HR_SENSITIVITY", sensitivity)?;
            Self::apply_env_var("THRESHOLD_VMA_HR_CORRECTION_CAP", cap)?;
        }

        // FTP
        Self::apply_env_var("THRESHOLD_FTP_MAX_AGE_DAYS", &mut self.ftp.max_age_days)?;
        Self::apply_env_var("THRESHOLD_FTP_HALF_LIFE_DAYS", &mut self.ftp.half_life_days)?;
        Self::apply_env_var("THRESHOLD_FTP_QUANTILE", &mut self.ftp.quantile)?;
        Self::apply_env_var("THRESHOLD_FTP_TOP_N", &mut self.ftp.top_n)?;
        if let Correction::Drift { ref mut percent } = self.ftp.correction {
            Self::apply_env_var("THRESHOLD_FTP_DRIFT_PERCENT", percent)?;
        }

        // CSS
        Self::apply_env_var(
            "THRESHOLD_CSS_MAX_AGE_DAYS",
            &mut self.css.best_efforts.max_age_days,
        )?;
        Self::apply_env_var(
            "THRESHOLD_CSS_HALF_LIFE_DAYS",
            &mut self.css.best_efforts.half_life_days,
        )?;

        // FTP-Hybrid
        Self::apply_env_var(
            "THRESHOLD_HYBRID_MIN_HR",
            &mut self.ftp_hybrid.min_hr_percent,
        )?;
        Self::apply_env_var(
            "THRESHOLD_HYBRID_UPLIFT_HR",
            &mut self.ftp_hybrid.uplift_hr_percent,
        )?;
        Self::apply_env_var(
            "THRESHOLD_HYBRID_MAX_UPLIFT",
            &mut self.ftp_hybrid.max_uplift,
        )?;
        Self::apply_env_var(
            "THRESHOLD_HYBRID_MAX_DRIFT_PERCENT",
            &mut self.ftp_hybrid.max_hr_drift_percent,
        )?;
        Self::apply_env_var(
            "THRESHOLD_HYBRID_REQUIRE_HR",
            &mut self.ftp_hybrid.require_heart_rate,
        )?;

        // Two-parameter models
        Self::apply_env_var(
            "THRESHOLD_CP_HALF_LIFE_DAYS",
            &mut self.critical_power.half_life_days,
        )?;
        Self::apply_env_var("THRESHOLD_CP_R2_FLOOR", &mut self.critical_power.r2_floor)?;
        Self::apply_env_var(
            "THRESHOLD_CP_ROBUST",
            &mut self.critical_power.robust_reweighting,
        )?;
        Self::apply_env_var(
            "THRESHOLD_CS_HALF_LIFE_DAYS",
            &mut self.critical_speed.half_life_days,
        )?;
        Self::apply_env_var("THRESHOLD_CS_R2_FLOOR", &mut self.critical_speed.r2_floor)?;
        Self::apply_env_var(
            "THRESHOLD_CS_ROBUST",
            &mut self.critical_speed.robust_reweighting,
        )?;

        Ok(self)
    }

    /// Validate every section, producing a configuration the engine accepts
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found
    pub fn validate(self) -> Result<EngineConfig<true>, ConfigError> {
        self.vma.validate()?;
        self.ftp.validate()?;
        self.css.validate()?;
        self.ftp_hybrid.validate()?;
        self.critical_power.validate()?;
        self.critical_speed.validate()?;
        self.zones.validate()?;

        Ok(EngineConfig {
            vma: self.vma,
            ftp: self.ftp,
            css: self.css,
            ftp_hybrid: self.ftp_hybrid,
            critical_power: self.critical_power,
            critical_speed: self.critical_speed,
            zones: self.zones,
            _phantom: PhantomData,
        })
    }
}

impl EngineConfig<true> {
    /// Defaults with environment overrides, validated
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        EngineConfig::<false>::default()
            .apply_env_overrides()?
            .validate()
    }

    /// JSON file with environment overrides, validated
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, an override is invalid or validation fails
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        EngineConfig::from_json_file(path)?
            .apply_env_overrides()?
            .validate()
    }
}
