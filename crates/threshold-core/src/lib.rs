// ABOUTME: Core types and constants for the physiological threshold engine
// ABOUTME: Foundation crate with error taxonomy, data models, and physiological defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Threshold Core
//!
//! Foundation crate for the threshold estimation engine. It holds the types
//! shared by every estimator and changes rarely, so the workspace benefits from
//! incremental compilation.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and `AppResult`
//! - **models**: effort candidates (inputs) and metrics/models (outputs)
//! - **constants**: physiological defaults used by the configuration layer

/// Unified error taxonomy
pub mod errors;

/// Effort inputs and metric outputs
pub mod models;

/// Physiological default constants organized by metric
pub mod constants;
