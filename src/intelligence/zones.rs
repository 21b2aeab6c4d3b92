// ABOUTME: Training zone splitting as fixed fractions of a threshold value
// ABOUTME: Z1 starts at zero; each later zone starts where the previous one ends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use threshold_core::constants::zones::LABELS;

/// One training zone in the threshold's native unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingZone {
    /// Zone identifier (`Z1`..)
    pub zone: String,
    /// Descriptive label
    pub label: String,
    /// Lower bound (inclusive)
    pub lower: f64,
    /// Upper bound (exclusive)
    pub upper: f64,
}

/// Split `threshold` into zones whose upper bounds are `upper_fractions x threshold`
///
/// `upper_fractions` must be ascending; configuration validation guarantees it.
#[must_use]
pub fn training_zones(threshold: f64, upper_fractions: &[f64]) -> Vec<TrainingZone> {
    let mut lower = 0.0;
    upper_fractions
        .iter()
        .enumerate()
        .map(|(index, fraction)| {
            let upper = threshold * fraction;
            let zone = TrainingZone {
                zone: format!("Z{}", index + 1),
                label: LABELS
                    .get(index)
                    .map_or_else(|| format!("Zone {}", index + 1), |label| (*label).to_owned()),
                lower,
                upper,
            };
            lower = upper;
            zone
        })
        .collect()
}
