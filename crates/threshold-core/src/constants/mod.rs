// ABOUTME: Physiological default constants for threshold estimation, organized by metric
// ABOUTME: Pure data constants used as configuration defaults, never as hardcoded policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Physiological defaults
//!
//! These values are population defaults. The engine reads them only through
//! its configuration layer so they can be overridden per deployment or per
//! athlete population.

/// Unit conversions
pub mod units {
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    /// Joules per kilojoule
    pub const JOULES_PER_KILOJOULE: f64 = 1000.0;
    /// Seconds per day
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// VMA (maximal aerobic speed) from ~6-minute efforts
///
/// Reference: Billat, V. & Koralsztein, J.P. (1996). Significance of the velocity
/// at VO2max and time to exhaustion at this velocity. *Sports Medicine*, 22(2).
pub mod vma {
    /// Shortest qualifying effort (seconds)
    pub const WINDOW_MIN_SECONDS: f64 = 300.0;
    /// Longest qualifying effort (seconds)
    pub const WINDOW_MAX_SECONDS: f64 = 420.0;
    /// Lookback window (days)
    pub const MAX_AGE_DAYS: f64 = 120.0;
    /// Recency half-life (days)
    pub const HALF_LIFE_DAYS: f64 = 30.0;
    /// Target heart rate as a fraction of max HR for a 6-minute test
    pub const TARGET_HR_PERCENT: f64 = 0.95;
    /// Speed correction per unit of HR fraction (km/h)
    pub const HR_SENSITIVITY_KMH: f64 = 6.0;
    /// Maximum absolute HR correction (km/h)
    pub const HR_CORRECTION_CAP_KMH: f64 = 0.3;
}

/// FTP from ~20-minute efforts
///
/// Reference: Allen, H., & Coggan, A. (2010). "Training and Racing with a Power Meter".
pub mod ftp {
    /// Shortest qualifying effort (seconds)
    pub const WINDOW_MIN_SECONDS: f64 = 1080.0;
    /// Longest qualifying effort (seconds)
    pub const WINDOW_MAX_SECONDS: f64 = 1320.0;
    /// Lookback window (days)
    pub const MAX_AGE_DAYS: f64 = 180.0;
    /// Recency half-life (days)
    pub const HALF_LIFE_DAYS: f64 = 60.0;
    /// Target heart rate fraction for a 20-minute effort
    pub const TARGET_HR_PERCENT: f64 = 0.85;
    /// Upward drift applied to the 20-minute derived value (percent)
    pub const DRIFT_PERCENT: f64 = 5.0;
}

/// CSS (critical swim speed)
///
/// Reference: Wakayoshi, K. et al. (1992). Determination and validity of critical
/// velocity as an index of swimming performance. *Eur J Appl Physiol*, 64(2).
pub mod css {
    /// Shortest best-effort duration (seconds)
    pub const WINDOW_MIN_SECONDS: f64 = 480.0;
    /// Longest best-effort duration (seconds)
    pub const WINDOW_MAX_SECONDS: f64 = 1800.0;
    /// Lookback window (days)
    pub const MAX_AGE_DAYS: f64 = 90.0;
    /// Recency half-life (days)
    pub const HALF_LIFE_DAYS: f64 = 30.0;
    /// Target heart rate fraction for threshold swims
    pub const TARGET_HR_PERCENT: f64 = 0.88;
    /// Short time-trial band (seconds), e.g. 200 m
    pub const SHORT_TRIAL_SECONDS: (f64, f64) = (120.0, 240.0);
    /// Long time-trial band (seconds), e.g. 400 m
    pub const LONG_TRIAL_SECONDS: (f64, f64) = (420.0, 900.0);
    /// Durations eligible for the distance/time regression (seconds)
    pub const REGRESSION_SECONDS: (f64, f64) = (60.0, 1800.0);
    /// Minimum efforts for the regression method
    pub const REGRESSION_MIN_POINTS: usize = 3;
}

/// FTP-Hybrid multi-window estimation
pub mod hybrid {
    /// Window lengths (minutes)
    pub const WINDOW_MINUTES: [u32; 6] = [15, 20, 25, 30, 35, 40];
    /// Power-duration decay factor per window
    pub const DURATION_FACTORS: [f64; 6] = [0.97, 0.955, 0.945, 0.93, 0.92, 0.91];
    /// Evidence weight per window (longer efforts weigh more)
    pub const WINDOW_WEIGHTS: [f64; 6] = [0.8, 1.2, 1.6, 2.0, 2.5, 3.0];
    /// Below this HR fraction the effort is rejected
    pub const MIN_HR_PERCENT: f64 = 0.80;
    /// Below this HR fraction the sub-maximal uplift applies
    pub const UPLIFT_HR_PERCENT: f64 = 0.90;
    /// Maximum uplift multiplier
    pub const MAX_UPLIFT: f64 = 1.03;
    /// Maximum tolerated HR drift during the effort (percent)
    pub const MAX_HR_DRIFT_PERCENT: f64 = 5.0;
    /// Lookback window (days)
    pub const MAX_AGE_DAYS: f64 = 180.0;
}

/// Normalized power smoothing
pub mod normalized_power {
    /// Rolling average window (seconds)
    pub const SMOOTHING_WINDOW_SECONDS: f64 = 30.0;
}

/// Critical Power / W' model
///
/// Reference: Monod, H., & Scherrer, J. (1965). The work capacity of a synergic
/// muscular group. *Ergonomics*, 8(3), 329-338.
pub mod critical_power {
    /// Mean-maximal duration grid (seconds)
    pub const DURATION_GRID: [f64; 11] = [
        60.0, 120.0, 180.0, 300.0, 420.0, 600.0, 900.0, 1200.0, 1800.0, 2400.0, 3600.0,
    ];
    /// Lookback window (days)
    pub const MAX_AGE_DAYS: f64 = 90.0;
    /// Recency half-life (days)
    pub const HALF_LIFE_DAYS: f64 = 90.0;
    /// Minimum acceptable R² before the reserve is clamped
    pub const R2_FLOOR: f64 = 0.90;
    /// Plausible W' lower bound (kJ)
    pub const RESERVE_MIN_KJ: f64 = 12.0;
    /// Plausible W' upper bound (kJ)
    pub const RESERVE_MAX_KJ: f64 = 40.0;
}

/// Critical Speed / D' model
///
/// Reference: Jones, A.M. & Vanhatalo, A. (2017). The 'Critical Power' concept:
/// applications to sports performance. *Sports Medicine*, 47(S1).
pub mod critical_speed {
    /// Mean-maximal duration grid (seconds)
    pub const DURATION_GRID: [f64; 8] = [120.0, 180.0, 300.0, 420.0, 600.0, 900.0, 1200.0, 1800.0];
    /// Lookback window (days)
    pub const MAX_AGE_DAYS: f64 = 90.0;
    /// Recency half-life (days)
    pub const HALF_LIFE_DAYS: f64 = 42.0;
    /// Minimum acceptable R² before the reserve is clamped
    pub const R2_FLOOR: f64 = 0.80;
    /// Plausible D' lower bound (meters)
    pub const RESERVE_MIN_M: f64 = 100.0;
    /// Plausible D' upper bound (meters)
    pub const RESERVE_MAX_M: f64 = 6000.0;
}

/// Two-parameter fitting
pub mod fitting {
    /// Outlier cutoff as a multiple of MAD
    pub const HUBER_MAD_MULTIPLIER: f64 = 1.5;
    /// Relative tolerance when matching an effort to a grid duration
    pub const GRID_TOLERANCE: f64 = 0.10;
    /// Minimum distinct-duration points for a fit
    pub const MIN_POINTS: usize = 3;
    /// Floor of the HR-quality penalty multiplier
    pub const HR_PENALTY_FLOOR: f64 = 0.3;
    /// HR shortfall that drives the penalty to its floor
    pub const HR_PENALTY_SPAN: f64 = 0.15;
    /// Default prediction intensities (fraction of threshold)
    pub const PREDICTION_INTENSITIES: [f64; 4] = [1.02, 1.05, 1.10, 1.20];
}

/// Effort quality scoring
pub mod quality {
    /// Gaussian tolerance around the target HR fraction
    pub const HR_TOLERANCE: f64 = 0.05;
    /// Coefficient of variation at which stability reaches zero
    pub const STABILITY_THRESHOLD: f64 = 0.15;
}

/// Confidence scoring
pub mod confidence {
    /// Candidate count scale for the saturating count score
    pub const COUNT_SCALE: f64 = 3.0;
    /// Coefficient of variation at which the dispersion score halves
    pub const CV_REFERENCE: f64 = 0.05;
    /// Weight of the count score
    pub const COUNT_WEIGHT: f64 = 0.40;
    /// Weight of the dispersion score
    pub const DISPERSION_WEIGHT: f64 = 0.35;
    /// Weight of the recency score
    pub const RECENCY_WEIGHT: f64 = 0.25;
}

/// Default estimator settings shared by single-threshold metrics
pub mod estimator {
    /// Maximum efforts retained after top-N selection
    pub const TOP_N: usize = 7;
    /// Quantile level for aggregation
    pub const QUANTILE: f64 = 0.90;
}

/// Training zone splits (fractions of the threshold; upper bounds of Z1..Z5)
pub mod zones {
    /// Power zones relative to FTP/CP (Coggan)
    pub const POWER_UPPER: [f64; 5] = [0.55, 0.75, 0.90, 1.05, 1.20];
    /// Running speed zones relative to VMA
    pub const VMA_UPPER: [f64; 5] = [0.70, 0.80, 0.88, 0.95, 1.05];
    /// Swim speed zones relative to CSS
    pub const CSS_UPPER: [f64; 5] = [0.80, 0.90, 0.97, 1.03, 1.10];
    /// Running speed zones relative to critical speed
    pub const CRITICAL_SPEED_UPPER: [f64; 5] = [0.78, 0.88, 0.95, 1.02, 1.15];
    /// Zone labels
    pub const LABELS: [&str; 5] = ["Recovery", "Endurance", "Tempo", "Threshold", "VO2max"];
}
