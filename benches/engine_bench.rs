// ABOUTME: Criterion benchmarks for the threshold engine and its hot algorithms
// ABOUTME: Measures report generation, batch parallelism, NP and the robust CP fit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the threshold engine.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

mod common;

use common::fixtures::{generate_snapshot, reference_time, HistorySize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use threshold_engine::config::{CriticalModelConfig, EngineConfig};
use threshold_engine::engine::{AthleteSnapshot, PerformanceEngine};
use threshold_engine::intelligence::algorithms::normalized_power;
use threshold_engine::intelligence::CriticalModelFitter;

#[allow(clippy::unwrap_used)]
fn engine() -> PerformanceEngine {
    PerformanceEngine::new(EngineConfig::<false>::default().validate().unwrap())
}

/// Benchmark a single report for small and large histories
fn bench_single_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_report");
    let engine = engine();

    for size in [HistorySize::Small, HistorySize::Large] {
        let snapshot = generate_snapshot(0, size);
        group.bench_with_input(
            BenchmarkId::new("generate_report", size.efforts_per_metric()),
            &snapshot,
            |b, snapshot| b.iter(|| engine.generate_report(black_box(snapshot), reference_time())),
        );
    }

    group.finish();
}

/// Benchmark parallel batch generation across athletes
fn bench_batch_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_reports");
    let engine = engine();

    for athletes in [10_usize, 100] {
        let snapshots: Vec<AthleteSnapshot> = (0..athletes)
            .map(|i| generate_snapshot(i, HistorySize::Small))
            .collect();
        group.throughput(Throughput::Elements(athletes as u64));
        group.bench_with_input(
            BenchmarkId::new("generate_reports", athletes),
            &snapshots,
            |b, snapshots| b.iter(|| engine.generate_reports(black_box(snapshots), reference_time())),
        );
    }

    group.finish();
}

/// Benchmark normalized power on one hour of 1 Hz data
fn bench_normalized_power(c: &mut Criterion) {
    let samples: Vec<f64> = (0..3600)
        .map(|s| if (s / 60) % 2 == 0 { 180.0 } else { 320.0 })
        .collect();
    c.bench_function("normalized_power_1h", |b| {
        b.iter(|| normalized_power(black_box(&samples), 1.0, 30.0));
    });
}

/// Benchmark the robust CP/W' fit on a season of mean-maximal efforts
fn bench_critical_power_fit(c: &mut Criterion) {
    let fitter = CriticalModelFitter::new(CriticalModelConfig::critical_power());
    let snapshot = generate_snapshot(0, HistorySize::Large).rebased(reference_time());
    c.bench_function("critical_power_fit", |b| {
        b.iter(|| fitter.fit(black_box(&snapshot.critical_power)));
    });
}

criterion_group!(
    benches,
    bench_single_report,
    bench_batch_reports,
    bench_normalized_power,
    bench_critical_power_fit
);
criterion_main!(benches);
