// ABOUTME: Effort candidate models consumed by the threshold estimators
// ABOUTME: Candidates, hybrid window efforts, weighted points, and athlete context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::{SECONDS_PER_DAY, SECONDS_PER_MINUTE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One qualifying segment extracted from a training session
///
/// Created fresh for every report request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortCandidate {
    /// Mean speed (km/h or m/s) or mean power (W) over the segment
    pub magnitude: f64,
    /// Effort duration in seconds
    pub duration_seconds: f64,
    /// Mean heart rate as a fraction of max HR, if an HR sensor was worn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_percent: Option<f64>,
    /// Days between the effort and the report's reference time
    #[serde(default)]
    pub age_days: f64,
    /// Coefficient of variation of the instantaneous magnitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude_cv: Option<f64>,
    /// Environmental factor in [0, 1] (heat, altitude, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_factor: Option<f64>,
    /// Source session identifier
    pub session_id: String,
    /// Source session display name
    #[serde(default)]
    pub session_name: String,
    /// Source session start time
    pub session_date: DateTime<Utc>,
}

impl EffortCandidate {
    /// Create a candidate with provenance and no optional quality signals
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        session_date: DateTime<Utc>,
        magnitude: f64,
        duration_seconds: f64,
    ) -> Self {
        Self {
            magnitude,
            duration_seconds,
            heart_rate_percent: None,
            age_days: 0.0,
            magnitude_cv: None,
            environment_factor: None,
            session_id: session_id.into(),
            session_name: String::new(),
            session_date,
        }
    }

    /// Set the session display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }

    /// Set the mean heart rate fraction
    #[must_use]
    pub const fn with_heart_rate(mut self, heart_rate_percent: f64) -> Self {
        self.heart_rate_percent = Some(heart_rate_percent);
        self
    }

    /// Set the age in days directly
    #[must_use]
    pub const fn with_age_days(mut self, age_days: f64) -> Self {
        self.age_days = age_days;
        self
    }

    /// Set the magnitude coefficient of variation
    #[must_use]
    pub const fn with_magnitude_cv(mut self, cv: f64) -> Self {
        self.magnitude_cv = Some(cv);
        self
    }

    /// Set the environmental factor
    #[must_use]
    pub const fn with_environment_factor(mut self, factor: f64) -> Self {
        self.environment_factor = Some(factor);
        self
    }

    /// Copy of this candidate with `age_days` recomputed against `as_of`
    ///
    /// Sessions dated after `as_of` get an age of zero.
    #[must_use]
    pub fn rebased(&self, as_of: DateTime<Utc>) -> Self {
        Self {
            age_days: age_in_days(self.session_date, as_of),
            ..self.clone()
        }
    }
}

/// Days elapsed from `date` to `as_of`, clamped at zero
#[must_use]
pub fn age_in_days(date: DateTime<Utc>, as_of: DateTime<Utc>) -> f64 {
    let seconds = (as_of - date).num_seconds() as f64;
    (seconds / SECONDS_PER_DAY).max(0.0)
}

/// One effort for a FTP-Hybrid duration window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridEffort {
    /// Window length this effort was extracted for (minutes)
    pub window_minutes: u32,
    /// Power samples covering the effort (watts)
    pub power_samples: Vec<f64>,
    /// Interval between samples (seconds)
    #[serde(default = "default_sample_interval")]
    pub sample_interval_seconds: f64,
    /// Mean heart rate as a fraction of max HR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_percent: Option<f64>,
    /// Heart rate drift across the effort (percent), if precomputed upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_drift_percent: Option<f64>,
    /// Raw heart rate samples, used to derive drift when it is not provided
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heart_rate_samples: Vec<f64>,
    /// Days between the effort and the report's reference time
    #[serde(default)]
    pub age_days: f64,
    /// Source session identifier
    pub session_id: String,
    /// Source session display name
    #[serde(default)]
    pub session_name: String,
    /// Source session start time
    pub session_date: DateTime<Utc>,
}

const fn default_sample_interval() -> f64 {
    1.0
}

impl HybridEffort {
    /// Copy of this effort with `age_days` recomputed against `as_of`
    #[must_use]
    pub fn rebased(&self, as_of: DateTime<Utc>) -> Self {
        Self {
            age_days: age_in_days(self.session_date, as_of),
            ..self.clone()
        }
    }

    /// Provenance view of this effort as a candidate with the given magnitude
    #[must_use]
    pub fn as_candidate(&self, magnitude: f64) -> EffortCandidate {
        EffortCandidate {
            magnitude,
            duration_seconds: f64::from(self.window_minutes) * SECONDS_PER_MINUTE,
            heart_rate_percent: self.heart_rate_percent,
            age_days: self.age_days,
            magnitude_cv: None,
            environment_factor: None,
            session_id: self.session_id.clone(),
            session_name: self.session_name.clone(),
            session_date: self.session_date,
        }
    }
}

/// A value paired with its aggregation weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    /// Observed value
    pub value: f64,
    /// Non-negative weight; zero excludes the point
    pub weight: f64,
}

impl WeightedPoint {
    /// Create a weighted point
    #[must_use]
    pub const fn new(value: f64, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Athlete context supplied alongside the effort history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteContext {
    /// Maximum heart rate (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<f64>,
    /// Body weight (kg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

impl AthleteContext {
    /// Convert an absolute heart rate (bpm) to a fraction of max HR
    #[must_use]
    pub fn heart_rate_fraction(&self, bpm: f64) -> Option<f64> {
        self.max_heart_rate
            .filter(|max| *max > 0.0 && bpm.is_finite())
            .map(|max| bpm / max)
    }

    /// Ratio of `value` to body weight (W/kg for power metrics)
    #[must_use]
    pub fn per_kg(&self, value: f64) -> Option<f64> {
        self.weight_kg
            .filter(|kg| *kg > 0.0)
            .map(|kg| value / kg)
            .filter(|ratio| ratio.is_finite())
    }
}
