// ABOUTME: Threshold estimators and model fitters built on the shared algorithm layer
// ABOUTME: VMA/FTP/CSS single thresholds, FTP-Hybrid, CP/W' and CS/D' models, training zones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Estimators turn effort histories into physiological thresholds. Every
//! estimator takes its configuration by value, holds no other state and is
//! safe to share across threads.

/// Pure leaf algorithms (decay, quality, aggregation, NP, regression, confidence)
pub mod algorithms;
/// Critical Power / W' and Critical Speed / D' fitting
pub mod critical_model;
/// Multi-method critical swim speed
pub mod css_estimator;
/// Multi-window FTP estimation
pub mod hybrid_estimator;
/// Single-threshold pipeline for VMA, FTP and CSS best efforts
pub mod threshold_estimator;
/// Training zone splitting
pub mod zones;

pub use critical_model::CriticalModelFitter;
pub use css_estimator::{CssEstimate, CssEstimator, CssMethod, CssMethodOutcome};
pub use hybrid_estimator::{heart_rate_drift_percent, HybridEstimator};
pub use threshold_estimator::ThresholdEstimator;
pub use zones::{training_zones, TrainingZone};
