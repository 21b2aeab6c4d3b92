// ABOUTME: Normalized Power from a power stream using a trailing rolling average
// ABOUTME: NP = fourth root of the mean of the fourth powers of 30-second smoothed power
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Normalized Power
//!
//! `NP = ⁴√(mean(rolling_mean_30s(power)⁴))`
//!
//! Reference: Allen, H., & Coggan, A. (2010). "Training and Racing with a Power Meter".

use crate::errors::{AppError, AppResult};

/// Number of samples covered by the smoothing window, at least one
fn window_len(sample_interval_seconds: f64, smoothing_window_seconds: f64) -> AppResult<usize> {
    if !sample_interval_seconds.is_finite() || sample_interval_seconds <= 0.0 {
        return Err(AppError::invalid_parameter(format!(
            "sample_interval_seconds must be > 0, got {sample_interval_seconds}"
        )));
    }
    if !smoothing_window_seconds.is_finite() || smoothing_window_seconds <= 0.0 {
        return Err(AppError::invalid_parameter(format!(
            "smoothing_window_seconds must be > 0, got {smoothing_window_seconds}"
        )));
    }
    Ok(((smoothing_window_seconds / sample_interval_seconds).round() as usize).max(1))
}

/// Normalized Power of `samples` (watts)
///
/// # Errors
///
/// - `InvalidParameter` for a non-positive interval or window
/// - `InsufficientData` if there are fewer samples than one window or the
///   result is not finite
pub fn normalized_power(
    samples: &[f64],
    sample_interval_seconds: f64,
    smoothing_window_seconds: f64,
) -> AppResult<f64> {
    let window = window_len(sample_interval_seconds, smoothing_window_seconds)?;
    if samples.len() < window {
        return Err(AppError::insufficient_data(format!(
            "normalized power needs at least {window} samples, got {}",
            samples.len()
        )));
    }

    let window_f = window as f64;
    let mut rolling: f64 = samples[..window].iter().sum();
    let mut fourth_power_sum = (rolling / window_f).powi(4);
    for i in window..samples.len() {
        rolling += samples[i] - samples[i - window];
        fourth_power_sum += (rolling / window_f).powi(4);
    }
    let smoothed_count = (samples.len() - window + 1) as f64;
    let np = (fourth_power_sum / smoothed_count).powf(0.25);

    if np.is_finite() {
        Ok(np)
    } else {
        Err(AppError::insufficient_data(
            "normalized power is not finite for this power stream",
        ))
    }
}

/// Variability index `NP / mean power`
///
/// # Errors
///
/// Propagates [`normalized_power`] errors; `InsufficientData` if mean power is not positive
pub fn variability_index(
    samples: &[f64],
    sample_interval_seconds: f64,
    smoothing_window_seconds: f64,
) -> AppResult<f64> {
    let np = normalized_power(samples, sample_interval_seconds, smoothing_window_seconds)?;
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    if mean <= 0.0 {
        return Err(AppError::insufficient_data(
            "variability index needs positive mean power",
        ));
    }
    AppError::ensure_finite(np / mean, "variability index")
}
