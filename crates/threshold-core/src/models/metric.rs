// ABOUTME: Output models produced by the estimators: scalar thresholds and two-parameter models
// ABOUTME: Carries value, confidence, dispersion, contributors, metadata, and fit statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::effort::EffortCandidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Single-value threshold metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Maximal aerobic speed (km/h)
    Vma,
    /// Functional threshold power (W)
    Ftp,
    /// Multi-window functional threshold power (W)
    FtpHybrid,
    /// Critical swim speed (m/s)
    Css,
}

impl MetricKind {
    /// Stable identifier
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vma => "vma",
            Self::Ftp => "ftp",
            Self::FtpHybrid => "ftp_hybrid",
            Self::Css => "css",
        }
    }

    /// Native unit of the metric value
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Vma => "km/h",
            Self::Ftp | Self::FtpHybrid => "W",
            Self::Css => "m/s",
        }
    }

    /// Whether the value is a power (enables W/kg)
    #[must_use]
    pub const fn is_power(self) -> bool {
        matches!(self, Self::Ftp | Self::FtpHybrid)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Two-parameter hyperbolic models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalModelKind {
    /// Critical Power (W) and W' (kJ)
    CriticalPower,
    /// Critical Speed (m/s) and D' (m)
    CriticalSpeed,
}

impl CriticalModelKind {
    /// Stable identifier
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CriticalPower => "cp_wprime",
            Self::CriticalSpeed => "cs_dprime",
        }
    }

    /// Unit of the threshold parameter
    #[must_use]
    pub const fn threshold_unit(self) -> &'static str {
        match self {
            Self::CriticalPower => "W",
            Self::CriticalSpeed => "m/s",
        }
    }

    /// Unit of the reserve parameter as reported
    #[must_use]
    pub const fn reserve_unit(self) -> &'static str {
        match self {
            Self::CriticalPower => "kJ",
            Self::CriticalSpeed => "m",
        }
    }
}

impl fmt::Display for CriticalModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate that contributed to a metric, with its final weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortContribution {
    /// The contributing effort
    #[serde(flatten)]
    pub effort: EffortCandidate,
    /// Final aggregation weight (quality x decay, or fit weight)
    pub weight: f64,
}

/// An effort excluded by a quality rule, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEffort {
    /// Source session identifier
    pub session_id: String,
    /// Duration window the effort was offered for, when applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_minutes: Option<u32>,
    /// Why it was excluded
    pub reason: String,
}

/// Computation details attached to a threshold metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricMetadata {
    /// Candidates that passed the extraction filter
    pub candidates_count: usize,
    /// Candidates that contributed with a positive weight
    pub used_count: usize,
    /// Aggregated value before corrections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<f64>,
    /// Whether a drift multiplier was applied
    pub drift_applied: bool,
    /// Drift multiplier in percent, when applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift_percent: Option<f64>,
    /// Additive heart-rate correction, when applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_correction: Option<f64>,
    /// Method that produced the value (e.g. `best_efforts`, `time_trials`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Duration windows that contributed (FTP-Hybrid)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows_used: Vec<u32>,
    /// Efforts excluded by quality rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedEffort>,
}

/// Single-value physiological threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMetric {
    /// Which metric this is
    pub kind: MetricKind,
    /// Estimated value in the metric's native unit
    pub value: f64,
    /// Confidence in [0, 100]
    pub confidence_percent: u8,
    /// Weighted standard deviation of the contributing values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_deviation: Option<f64>,
    /// Efforts used, strongest first
    pub contributors: Vec<EffortContribution>,
    /// Computation details
    pub metadata: MetricMetadata,
    /// Value per kilogram of body weight (power metrics only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_kg: Option<f64>,
}

/// Goodness-of-fit statistics for a two-parameter model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStats {
    /// Coefficient of determination
    pub r2: f64,
    /// Root-mean-square residual in native magnitude units
    pub rmse: f64,
    /// Points retained after robust reweighting
    pub n: usize,
}

/// Computation details attached to a critical model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalModelMetadata {
    /// Whether the reserve was clamped into its plausible range
    pub reserve_clamped: bool,
    /// Reserve from the unconstrained fit (reporting units)
    pub unconstrained_reserve: f64,
    /// Whether R² fell below the configured quality floor
    pub low_fit_quality: bool,
    /// Points the robust pass dropped or down-weighted
    pub downweighted_points: usize,
    /// Whether the robust outlier pass ran
    pub robust_reweighting: bool,
    /// Duration bands represented in the fit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bands: Vec<String>,
}

/// Two-parameter endurance model (CP/W' or CS/D')
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalModel {
    /// Which model this is
    pub kind: CriticalModelKind,
    /// Critical power (W) or critical speed (m/s)
    pub threshold_value: f64,
    /// W' (kJ) or D' (m)
    pub reserve_value: f64,
    /// Fit quality
    pub fit_stats: FitStats,
    /// Intensity label (e.g. "105%") to sustainable duration in seconds
    pub predictions: BTreeMap<String, f64>,
    /// Confidence in [0, 100]
    pub confidence_percent: u8,
    /// Mean-maximal efforts used in the fit
    pub contributors: Vec<EffortContribution>,
    /// Computation details
    pub metadata: CriticalModelMetadata,
    /// Threshold per kilogram (CP only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_kg: Option<f64>,
}
