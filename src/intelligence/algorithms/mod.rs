// ABOUTME: Leaf algorithms shared by every threshold estimator
// ABOUTME: Decay, quality scoring, weighted aggregation, normalized power, regression, confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Estimation Algorithms
//!
//! Pure functions with no knowledge of which metric they serve. Each one
//! validates its own parameters and reports failures through `AppError`.

pub mod confidence;
pub mod decay;
pub mod normalized_power;
pub mod quality;
pub mod quantile;
pub mod regression;

pub use confidence::{confidence_percent, scaled_confidence};
pub use decay::decay_weight;
pub use normalized_power::{normalized_power, variability_index};
pub use quality::quality_weight;
pub use quantile::{weighted_mean, weighted_quantile, weighted_std_dev};
pub use regression::{
    fit_statistics, robust_least_squares, weighted_least_squares, LinearFit, Observation,
    RobustFit,
};
