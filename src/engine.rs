// ABOUTME: Performance engine orchestrating every estimator for one or many athletes
// ABOUTME: Rebases ages on an injected reference time and isolates failures per metric
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Performance Engine
//!
//! The engine is built from a validated [`EngineConfig<true>`], so parameter
//! errors surface at configuration load time. A failing metric never takes
//! down the report: it is listed as unavailable with its reason.

use crate::config::EngineConfig;
use crate::errors::{AppResult, ErrorCode};
use crate::intelligence::{CriticalModelFitter, CssEstimator, HybridEstimator, ThresholdEstimator};
use crate::report::{EstimatedMetrics, MetricReportAssembler, PerformanceReport, UnavailableMetric};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use threshold_core::models::{
    AthleteContext, CriticalModelKind, EffortCandidate, HybridEffort, MetricKind, ThresholdMetric,
};
use tracing::{debug, info, warn};

/// Effort history for one athlete, pre-extracted per metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteSnapshot {
    /// Athlete identifier
    pub athlete_id: String,
    /// Max heart rate and body weight
    pub context: AthleteContext,
    /// ~6-minute running efforts
    pub vma: Vec<EffortCandidate>,
    /// ~20-minute cycling efforts
    pub ftp: Vec<EffortCandidate>,
    /// Swim efforts of any length
    pub css: Vec<EffortCandidate>,
    /// FTP-Hybrid window efforts with power streams
    pub ftp_hybrid: Vec<HybridEffort>,
    /// Cycling mean-maximal efforts
    pub critical_power: Vec<EffortCandidate>,
    /// Running mean-maximal efforts
    pub critical_speed: Vec<EffortCandidate>,
}

impl AthleteSnapshot {
    /// Copy with every age recomputed against `as_of`
    #[must_use]
    pub fn rebased(&self, as_of: DateTime<Utc>) -> Self {
        let rebase = |efforts: &[EffortCandidate]| -> Vec<EffortCandidate> {
            efforts.iter().map(|effort| effort.rebased(as_of)).collect()
        };
        Self {
            athlete_id: self.athlete_id.clone(),
            context: self.context.clone(),
            vma: rebase(&self.vma),
            ftp: rebase(&self.ftp),
            css: rebase(&self.css),
            ftp_hybrid: self
                .ftp_hybrid
                .iter()
                .map(|effort| effort.rebased(as_of))
                .collect(),
            critical_power: rebase(&self.critical_power),
            critical_speed: rebase(&self.critical_speed),
        }
    }
}

/// Runs every estimator and assembles the report
#[derive(Debug, Clone)]
pub struct PerformanceEngine {
    vma: ThresholdEstimator,
    ftp: ThresholdEstimator,
    css: CssEstimator,
    ftp_hybrid: HybridEstimator,
    critical_power: CriticalModelFitter,
    critical_speed: CriticalModelFitter,
    assembler: MetricReportAssembler,
}

impl PerformanceEngine {
    /// Build the engine from a validated configuration
    #[must_use]
    pub fn new(config: EngineConfig<true>) -> Self {
        Self {
            vma: ThresholdEstimator::new(config.vma),
            ftp: ThresholdEstimator::new(config.ftp),
            css: CssEstimator::new(config.css),
            ftp_hybrid: HybridEstimator::new(config.ftp_hybrid),
            critical_power: CriticalModelFitter::new(config.critical_power),
            critical_speed: CriticalModelFitter::new(config.critical_speed),
            assembler: MetricReportAssembler::new(config.zones),
        }
    }

    /// Generate the report for one athlete
    ///
    /// Candidate ages are recomputed from their session dates against `as_of`.
    #[must_use]
    pub fn generate_report(
        &self,
        snapshot: &AthleteSnapshot,
        as_of: DateTime<Utc>,
    ) -> PerformanceReport {
        let snapshot = snapshot.rebased(as_of);
        let athlete = &snapshot.context;
        let mut failures = Vec::new();

        let with_per_kg = |mut metric: ThresholdMetric| {
            if metric.kind.is_power() {
                metric.per_kg = athlete.per_kg(metric.value);
            }
            metric
        };

        let vma = isolate(
            MetricKind::Vma.name(),
            self.vma.estimate(&snapshot.vma),
            &mut failures,
        )
        .map(with_per_kg);
        let ftp = isolate(
            MetricKind::Ftp.name(),
            self.ftp.estimate(&snapshot.ftp),
            &mut failures,
        )
        .map(with_per_kg);
        let ftp_hybrid = isolate(
            MetricKind::FtpHybrid.name(),
            self.ftp_hybrid.estimate(&snapshot.ftp_hybrid, athlete),
            &mut failures,
        )
        .map(with_per_kg);
        let css = isolate(
            MetricKind::Css.name(),
            self.css.estimate(&snapshot.css).map(Some),
            &mut failures,
        );
        let critical_power = isolate(
            CriticalModelKind::CriticalPower.name(),
            self.critical_power.fit(&snapshot.critical_power),
            &mut failures,
        )
        .map(|mut model| {
            model.per_kg = athlete.per_kg(model.threshold_value);
            model
        });
        let critical_speed = isolate(
            CriticalModelKind::CriticalSpeed.name(),
            self.critical_speed.fit(&snapshot.critical_speed),
            &mut failures,
        );

        let report = self.assembler.assemble(
            EstimatedMetrics {
                vma,
                ftp,
                ftp_hybrid,
                css,
                critical_power,
                critical_speed,
                failures,
            },
            as_of,
            snapshot.athlete_id.clone(),
        );

        info!(
            athlete_id = %report.athlete_id,
            available = report.available_count(),
            unavailable = report.unavailable.len(),
            "Performance report generated"
        );
        report
    }

    /// Generate reports for many athletes in parallel
    #[must_use]
    pub fn generate_reports(
        &self,
        snapshots: &[AthleteSnapshot],
        as_of: DateTime<Utc>,
    ) -> Vec<PerformanceReport> {
        snapshots
            .par_iter()
            .map(|snapshot| self.generate_report(snapshot, as_of))
            .collect()
    }
}

/// Turn an estimator error into an unavailable entry so other metrics still report
fn isolate<T>(
    metric: &str,
    result: AppResult<Option<T>>,
    failures: &mut Vec<UnavailableMetric>,
) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            if e.code == ErrorCode::InsufficientData {
                debug!(metric_name = metric, error = %e, "Metric not yet available");
            } else {
                warn!(metric_name = metric, error = %e, "Metric estimation failed");
            }
            failures.push(UnavailableMetric::new(metric, e.message));
            None
        }
    }
}
