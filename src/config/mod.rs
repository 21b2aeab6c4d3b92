// ABOUTME: Configuration module for per-metric estimator settings and engine-wide options
// ABOUTME: Handles defaults, JSON files, environment overrides and typestate validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the threshold engine
//!
//! - **Estimator**: duration windows, quality policy and corrections for VMA, FTP and CSS
//! - **Hybrid**: FTP-Hybrid window ladder and heart rate gates
//! - **Critical**: CP/W' and CS/D' fitting parameters and plausibility bounds
//! - **Zones**: training zone splits
//! - **Engine**: the validated container passed to `PerformanceEngine`

/// Two-parameter model fitting configuration
pub mod critical;
/// Top-level engine configuration
pub mod engine;
/// Configuration error types
pub mod error;
/// Single-threshold estimator configuration
pub mod estimator;
/// FTP-Hybrid configuration
pub mod hybrid;
/// Training zone configuration
pub mod zones;

pub use critical::{CriticalModelConfig, DurationBand};
pub use engine::EngineConfig;
pub use error::ConfigError;
pub use estimator::{
    ConfidenceConfig, Correction, CssConfig, DurationWindow, QualityPolicy, ThresholdConfig,
};
pub use hybrid::{HybridConfig, HybridWindow};
pub use zones::ZonesConfig;
