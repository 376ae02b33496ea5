// ABOUTME: Core types and constants for the FitFuture analytics engine
// ABOUTME: Foundation crate with models, error handling, and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

#![deny(unsafe_code)]

//! # FitFuture Core
//!
//! Foundation crate providing the shared vocabulary of the FitFuture
//! comparison and projection engine. This crate is designed to change
//! infrequently so the algorithm crate can iterate without recompiling
//! its consumers.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with [`errors::EngineError`]
//! - **models**: Metric, log entry, and demographic cohort types
//! - **constants**: Plausibility ranges and engine defaults

/// Unified error handling for the engine
pub mod errors;

/// Metric, log entry, and demographic cohort models
pub mod models;

/// Plausibility ranges and engine defaults
pub mod constants;
