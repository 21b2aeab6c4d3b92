// ABOUTME: Configuration error types for engine configuration loading and validation
// ABOUTME: Defines error variants for invalid ranges, bad weights, parse and file failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for engine configuration validation.

use std::io;
use thiserror::Error;
use threshold_core::errors::AppError;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bounds in the wrong order (e.g. window min >= max)
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// Weights don't sum to the required total
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Failed to parse an environment override
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file is not valid JSON for the schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::invalid_parameter(error.to_string())
    }
}

/// Check that `value` is finite and strictly positive
pub(crate) fn require_positive(value: f64, name: &str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(format!(
            "{name} must be > 0, got {value}"
        )))
    }
}

/// Check that `value` lies in the closed interval `[min, max]`
pub(crate) fn require_within(value: f64, min: f64, max: f64, name: &str) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(format!(
            "{name} must be within [{min}, {max}], got {value}"
        )))
    }
}

/// Check that `values` are finite, positive and strictly ascending
pub(crate) fn require_ascending(values: &[f64], name: &str) -> Result<(), ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::InvalidRange(format!("{name} must not be empty")));
    }
    for value in values {
        require_positive(*value, name)?;
    }
    if values.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ConfigError::InvalidRange(format!(
            "{name} must be strictly ascending"
        )));
    }
    Ok(())
}
