// ABOUTME: Main library entry point for the physiological threshold estimation engine
// ABOUTME: Estimates VMA, FTP, FTP-Hybrid, CSS, CP/W' and CS/D' from effort histories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Threshold Engine
//!
//! Turns an athlete's historical efforts into physiological thresholds with a
//! confidence score, the contributing efforts and computation metadata.
//!
//! ## Metrics
//!
//! - **VMA**: maximal aerobic speed from ~6 minute running efforts
//! - **FTP**: functional threshold power from ~20 minute efforts
//! - **FTP-Hybrid**: FTP combined across 15 to 40 minute windows
//! - **CSS**: critical swim speed, three methods with a priority order
//! - **CP/W'** and **CS/D'**: two-parameter hyperbolic models
//!
//! ## Architecture
//!
//! - **config**: typestate configuration validated before any estimator runs
//! - **intelligence**: pure algorithms and the estimators built on them
//! - **report**: assembly of estimator outputs into a serializable report
//! - **engine**: orchestration, failure isolation and parallel batches
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use threshold_engine::config::EngineConfig;
//! use threshold_engine::engine::{AthleteSnapshot, PerformanceEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::load()?;
//! let engine = PerformanceEngine::new(config);
//! let report = engine.generate_report(&AthleteSnapshot::default(), Utc::now());
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

/// Configuration with typestate validation and environment overrides
pub mod config;

/// Engine orchestration across every estimator
pub mod engine;

/// Estimators and their leaf algorithms
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Report types and assembly
pub mod report;

// Re-export the foundation crate so callers only need one dependency
pub use threshold_core::{constants, errors, models};

pub use config::EngineConfig;
pub use engine::{AthleteSnapshot, PerformanceEngine};
pub use errors::{AppError, AppResult, ErrorCode};
pub use report::PerformanceReport;
