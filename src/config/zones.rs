// ABOUTME: Training zone split configuration relative to each threshold metric
// ABOUTME: Upper bounds of Z1..Z5 as fractions of the threshold, validated ascending
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::error::{require_ascending, ConfigError};
use serde::{Deserialize, Serialize};
use threshold_core::constants::zones;

/// Zone splits per threshold family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonesConfig {
    /// Power zones applied to FTP, FTP-Hybrid and CP
    pub power: Vec<f64>,
    /// Running zones applied to VMA
    pub vma: Vec<f64>,
    /// Swim zones applied to CSS
    pub css: Vec<f64>,
    /// Running zones applied to critical speed
    pub critical_speed: Vec<f64>,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            power: zones::POWER_UPPER.to_vec(),
            vma: zones::VMA_UPPER.to_vec(),
            css: zones::CSS_UPPER.to_vec(),
            critical_speed: zones::CRITICAL_SPEED_UPPER.to_vec(),
        }
    }
}

impl ZonesConfig {
    /// Validate that every split list is positive and strictly ascending
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` for an empty or unordered list
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_ascending(&self.power, "zones.power")?;
        require_ascending(&self.vma, "zones.vma")?;
        require_ascending(&self.css, "zones.css")?;
        require_ascending(&self.critical_speed, "zones.critical_speed")
    }
}
