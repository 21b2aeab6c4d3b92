// ABOUTME: Command-line front end that turns athlete snapshot JSON into performance reports
// ABOUTME: Loads validated configuration, runs the engine at a fixed reference time, writes JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Report for one athlete as of now
//! threshold-report --input athlete.json
//!
//! # Batch of athletes at a fixed reference time, pretty printed to a file
//! threshold-report --input squad.json --as-of 2025-06-01T00:00:00Z --pretty --output reports.json
//!
//! # Custom configuration file (environment overrides still apply)
//! threshold-report --input athlete.json --config engine.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use threshold_engine::config::EngineConfig;
use threshold_engine::engine::{AthleteSnapshot, PerformanceEngine};
use threshold_engine::logging;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "threshold-report",
    about = "Estimate physiological thresholds from effort history",
    long_about = "Reads one athlete snapshot or an array of snapshots as JSON and writes the performance report(s) as JSON."
)]
struct Cli {
    /// Snapshot JSON file (single object or array)
    #[arg(long)]
    input: PathBuf,

    /// Reference time in RFC 3339 (defaults to now)
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Engine configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotInput {
    Batch(Vec<AthleteSnapshot>),
    Single(Box<AthleteSnapshot>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env()?;

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EngineConfig::load().context("Failed to load configuration")?,
    };
    let engine = PerformanceEngine::new(config);
    let as_of = cli.as_of.unwrap_or_else(Utc::now);

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let input: SnapshotInput = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid snapshot JSON in {}", cli.input.display()))?;

    let output = match input {
        SnapshotInput::Batch(snapshots) => {
            info!(athletes = snapshots.len(), %as_of, "Generating batch reports");
            let reports = engine.generate_reports(&snapshots, as_of);
            render(&reports, cli.pretty)?
        }
        SnapshotInput::Single(snapshot) => {
            let report = engine.generate_report(&snapshot, as_of);
            render(&report, cli.pretty)?
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
