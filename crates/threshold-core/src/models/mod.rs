// ABOUTME: Core data models for the threshold engine
// ABOUTME: Re-exports effort inputs and metric outputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Effort candidates, hybrid window efforts, weighted points, athlete context
pub mod effort;
/// Threshold metrics and critical models
pub mod metric;

pub use effort::{age_in_days, AthleteContext, EffortCandidate, HybridEffort, WeightedPoint};
pub use metric::{
    CriticalModel, CriticalModelKind, CriticalModelMetadata, EffortContribution, FitStats,
    MetricKind, MetricMetadata, RejectedEffort, ThresholdMetric,
};
