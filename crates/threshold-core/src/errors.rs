// ABOUTME: Unified error taxonomy for threshold estimation with standard error codes
// ABOUTME: Separates recoverable data shortfalls from configuration/programming errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Every estimator in the engine reports failures through [`AppError`]. The
//! error code tells the caller how to react:
//!
//! - [`ErrorCode::InsufficientData`], [`ErrorCode::SingularMatrix`] and
//!   [`ErrorCode::NonFiniteResult`] are *recoverable*: the metric concerned is
//!   simply omitted from the report ("not yet available").
//! - [`ErrorCode::InvalidParameter`] is a configuration or programming error and
//!   should surface at configuration-load time.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Fewer qualifying candidates or points than the algorithm's minimum
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData,
    /// A parameter violates a precondition (e.g. non-positive half-life)
    #[serde(rename = "INVALID_PARAMETER")]
    InvalidParameter,
    /// Weighted least-squares normal equations are not invertible
    #[serde(rename = "SINGULAR_MATRIX")]
    SingularMatrix,
    /// An intermediate computation produced NaN or infinity
    #[serde(rename = "NON_FINITE_RESULT")]
    NonFiniteResult,
}

impl ErrorCode {
    /// Get a user-facing description for this error code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InsufficientData => "Not enough qualifying efforts to compute this metric",
            Self::InvalidParameter => "A configuration parameter is invalid",
            Self::SingularMatrix => "The model could not be fitted to the available efforts",
            Self::NonFiniteResult => "The computation produced a non-finite value",
        }
    }

    /// Stable machine-readable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientData => "INSUFFICIENT_DATA",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::SingularMatrix => "SINGULAR_MATRIX",
            Self::NonFiniteResult => "NON_FINITE_RESULT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine error with a code and a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Not enough qualifying data
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientData, message)
    }

    /// Invalid configuration or call parameter
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameter, message)
    }

    /// Normal-equations matrix not invertible
    pub fn singular_matrix(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SingularMatrix, message)
    }

    /// NaN or infinity reached an output
    pub fn non_finite(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NonFiniteResult, message)
    }

    /// Whether the caller should treat this as "metric unavailable" rather than a failure
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.code, ErrorCode::InvalidParameter)
    }

    /// Guard a computed value: non-finite numbers become `NonFiniteResult`
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::NonFiniteResult` if `value` is NaN or infinite
    pub fn ensure_finite(value: f64, what: &str) -> AppResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::non_finite(format!("{what} is not finite ({value})")))
        }
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_codes() {
        assert!(AppError::insufficient_data("none").is_recoverable());
        assert!(AppError::singular_matrix("det=0").is_recoverable());
        assert!(AppError::non_finite("nan").is_recoverable());
        assert!(!AppError::invalid_parameter("half-life").is_recoverable());
    }

    #[test]
    fn test_display_includes_code() {
        let error = AppError::invalid_parameter("half_life_days must be > 0");
        assert_eq!(
            error.to_string(),
            "INVALID_PARAMETER: half_life_days must be > 0"
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert!(AppError::ensure_finite(1.0, "x").is_ok());
        let err = AppError::ensure_finite(f64::NAN, "x").unwrap_err();
        assert_eq!(err.code, ErrorCode::NonFiniteResult);
    }
}
