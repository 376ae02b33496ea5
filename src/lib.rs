// ABOUTME: FitFuture engine facade crate wiring storage, config, and the insight algorithms
// ABOUTME: Exposes AnalyticsEngine with compare, project, and reference reload operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

#![deny(unsafe_code)]

//! # FitFuture
//!
//! Population comparison and projection engine for a personal fitness log.
//! Users' raw log entries are normalized into canonical metric vectors,
//! compared against demographic cohorts drawn from three population
//! reference datasets, and extrapolated forward with a simple, explainable
//! trend model.
//!
//! This crate is the library boundary: [`engine::AnalyticsEngine`] consumes
//! a [`store::LogEntryStore`] (the external record store) and exposes
//! `compare`, `project`, and `reload_reference_data` to the caller. The
//! algorithms themselves live in `fitfuture-insight`; the shared vocabulary
//! in `fitfuture-core`.

/// Engine facade: compare, project, and reference reload
pub mod engine;

/// Record store boundary and the in-memory implementation
pub mod store;

/// Engine configuration with environment overrides
pub mod config;

/// Structured logging setup
pub mod logging;

pub use fitfuture_core::{constants, errors, models};
pub use fitfuture_insight::{comparator, normalizer, projector, reference};
