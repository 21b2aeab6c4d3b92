// ABOUTME: Performance report types and the assembler that packages estimator outputs
// ABOUTME: Adds training zones, lists unavailable metrics with reasons, never re-runs estimators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Performance Report
//!
//! [`MetricReportAssembler`] turns [`EstimatedMetrics`] into an immutable
//! [`PerformanceReport`] ready to be serialized for the presentation layer.

use crate::config::ZonesConfig;
use crate::intelligence::{training_zones, CssEstimate, CssMethodOutcome, TrainingZone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use threshold_core::models::{
    CriticalModel, CriticalModelKind, CriticalModelMetadata, EffortContribution, FitStats,
    MetricKind, MetricMetadata, ThresholdMetric,
};

/// Reason given for a metric absent without an explicit failure
const NO_QUALIFYING_EFFORTS: &str = "insufficient qualifying efforts";

/// Raw estimator outputs for one athlete
#[derive(Debug, Clone, Default)]
pub struct EstimatedMetrics {
    /// VMA
    pub vma: Option<ThresholdMetric>,
    /// FTP
    pub ftp: Option<ThresholdMetric>,
    /// FTP-Hybrid
    pub ftp_hybrid: Option<ThresholdMetric>,
    /// CSS with every method's outcome
    pub css: Option<CssEstimate>,
    /// CP/W'
    pub critical_power: Option<CriticalModel>,
    /// CS/D'
    pub critical_speed: Option<CriticalModel>,
    /// Metrics whose estimator failed, with the reason
    pub failures: Vec<UnavailableMetric>,
}

/// A metric that could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableMetric {
    /// Metric identifier (`vma`, `cp_wprime`, ...)
    pub metric: String,
    /// Why it is unavailable
    pub reason: String,
}

impl UnavailableMetric {
    /// Create an entry for `metric`
    pub fn new(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            reason: reason.into(),
        }
    }
}

/// Presentation entry for a single-value threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Metric kind
    pub metric: MetricKind,
    /// Value in `unit`
    pub value: f64,
    /// Native unit
    pub unit: String,
    /// Confidence in [0, 100]
    pub confidence_percent: u8,
    /// Weighted standard deviation of contributors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_deviation: Option<f64>,
    /// Value per kg (power metrics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_kg: Option<f64>,
    /// Training zones derived from the value
    pub zones: Vec<TrainingZone>,
    /// Contributing efforts
    pub contributors: Vec<EffortContribution>,
    /// Computation details
    pub metadata: MetricMetadata,
}

/// Presentation entry for a two-parameter model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalModelEntry {
    /// Model kind
    pub model: CriticalModelKind,
    /// CP (W) or CS (m/s)
    pub threshold_value: f64,
    /// Threshold unit
    pub threshold_unit: String,
    /// W' (kJ) or D' (m)
    pub reserve_value: f64,
    /// Reserve unit
    pub reserve_unit: String,
    /// Fit quality
    pub fit_stats: FitStats,
    /// Intensity label to time to exhaustion (seconds)
    pub predictions: BTreeMap<String, f64>,
    /// Confidence in [0, 100]
    pub confidence_percent: u8,
    /// Threshold per kg (CP)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_kg: Option<f64>,
    /// Training zones derived from the threshold
    pub zones: Vec<TrainingZone>,
    /// Efforts used in the fit
    pub contributors: Vec<EffortContribution>,
    /// Computation details
    pub metadata: CriticalModelMetadata,
}

/// Complete report for one athlete at one reference time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Athlete identifier
    pub athlete_id: String,
    /// Reference time every age was computed against
    pub as_of: DateTime<Utc>,
    /// VMA (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vma: Option<MetricEntry>,
    /// FTP (W)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp: Option<MetricEntry>,
    /// FTP-Hybrid (W)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_hybrid: Option<MetricEntry>,
    /// CSS (m/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<MetricEntry>,
    /// Outcome of every CSS method
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css_methods: Vec<CssMethodOutcome>,
    /// CP/W'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_power: Option<CriticalModelEntry>,
    /// CS/D'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_speed: Option<CriticalModelEntry>,
    /// Metrics not yet available, with reasons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<UnavailableMetric>,
}

impl PerformanceReport {
    /// Number of metrics and models present
    #[must_use]
    pub fn available_count(&self) -> usize {
        [
            self.vma.is_some(),
            self.ftp.is_some(),
            self.ftp_hybrid.is_some(),
            self.css.is_some(),
            self.critical_power.is_some(),
            self.critical_speed.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Packages estimator outputs into a [`PerformanceReport`]
#[derive(Debug, Clone)]
pub struct MetricReportAssembler {
    zones: ZonesConfig,
}

impl MetricReportAssembler {
    /// Create an assembler with validated zone splits
    #[must_use]
    pub const fn new(zones: ZonesConfig) -> Self {
        Self { zones }
    }

    fn metric_zones(&self, kind: MetricKind) -> &[f64] {
        match kind {
            MetricKind::Vma => &self.zones.vma,
            MetricKind::Ftp | MetricKind::FtpHybrid => &self.zones.power,
            MetricKind::Css => &self.zones.css,
        }
    }

    fn model_zones(&self, kind: CriticalModelKind) -> &[f64] {
        match kind {
            CriticalModelKind::CriticalPower => &self.zones.power,
            CriticalModelKind::CriticalSpeed => &self.zones.critical_speed,
        }
    }

    fn metric_entry(&self, metric: ThresholdMetric) -> MetricEntry {
        MetricEntry {
            metric: metric.kind,
            value: metric.value,
            unit: metric.kind.unit().to_owned(),
            confidence_percent: metric.confidence_percent,
            standard_deviation: metric.standard_deviation,
            per_kg: metric.per_kg,
            zones: training_zones(metric.value, self.metric_zones(metric.kind)),
            contributors: metric.contributors,
            metadata: metric.metadata,
        }
    }

    fn model_entry(&self, model: CriticalModel) -> CriticalModelEntry {
        CriticalModelEntry {
            model: model.kind,
            threshold_value: model.threshold_value,
            threshold_unit: model.kind.threshold_unit().to_owned(),
            reserve_value: model.reserve_value,
            reserve_unit: model.kind.reserve_unit().to_owned(),
            fit_stats: model.fit_stats,
            predictions: model.predictions,
            confidence_percent: model.confidence_percent,
            per_kg: model.per_kg,
            zones: training_zones(model.threshold_value, self.model_zones(model.kind)),
            contributors: model.contributors,
            metadata: model.metadata,
        }
    }

    /// Assemble the report
    #[must_use]
    pub fn assemble(
        &self,
        estimated: EstimatedMetrics,
        as_of: DateTime<Utc>,
        athlete_id: impl Into<String>,
    ) -> PerformanceReport {
        let EstimatedMetrics {
            vma,
            ftp,
            ftp_hybrid,
            css,
            critical_power,
            critical_speed,
            failures,
        } = estimated;
        let mut unavailable = failures;
        let mut mark_absent = |name: &str, present: bool, reason: &str| {
            if !present && !unavailable.iter().any(|u| u.metric == name) {
                unavailable.push(UnavailableMetric::new(name, reason));
            }
        };

        mark_absent(MetricKind::Vma.name(), vma.is_some(), NO_QUALIFYING_EFFORTS);
        mark_absent(MetricKind::Ftp.name(), ftp.is_some(), NO_QUALIFYING_EFFORTS);
        mark_absent(
            MetricKind::FtpHybrid.name(),
            ftp_hybrid.is_some(),
            NO_QUALIFYING_EFFORTS,
        );

        let (css_metric, css_methods) = match css {
            Some(estimate) => (estimate.primary, estimate.methods),
            None => (None, Vec::new()),
        };
        let css_reason = css_unavailable_reason(&css_methods);
        mark_absent(MetricKind::Css.name(), css_metric.is_some(), &css_reason);
        mark_absent(
            CriticalModelKind::CriticalPower.name(),
            critical_power.is_some(),
            NO_QUALIFYING_EFFORTS,
        );
        mark_absent(
            CriticalModelKind::CriticalSpeed.name(),
            critical_speed.is_some(),
            NO_QUALIFYING_EFFORTS,
        );

        PerformanceReport {
            athlete_id: athlete_id.into(),
            as_of,
            vma: vma.map(|m| self.metric_entry(m)),
            ftp: ftp.map(|m| self.metric_entry(m)),
            ftp_hybrid: ftp_hybrid.map(|m| self.metric_entry(m)),
            css: css_metric.map(|m| self.metric_entry(m)),
            css_methods,
            critical_power: critical_power.map(|m| self.model_entry(m)),
            critical_speed: critical_speed.map(|m| self.model_entry(m)),
            unavailable,
        }
    }
}

/// Combined reason from every CSS method that produced no value
fn css_unavailable_reason(methods: &[CssMethodOutcome]) -> String {
    let reasons: Vec<String> = methods
        .iter()
        .filter_map(|outcome| {
            outcome
                .reason
                .as_ref()
                .map(|reason| format!("{}: {reason}", outcome.method))
        })
        .collect();
    if reasons.is_empty() {
        NO_QUALIFYING_EFFORTS.to_owned()
    } else {
        reasons.join("; ")
    }
}
