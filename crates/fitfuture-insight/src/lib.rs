// ABOUTME: Population comparison and trend projection algorithms for FitFuture
// ABOUTME: Reference dataset index, metric normalizer, comparator, and trend projector
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

#![deny(unsafe_code)]

//! # FitFuture Insight
//!
//! The deterministic core of FitFuture's analytics view: population
//! comparison and near-future trend projection. Everything here is a pure
//! computation over its inputs except [`reference::ReferenceIndex`], which is
//! built once from the source datasets and shared read-only afterwards.
//!
//! This is an explainable comparison-and-trend-line feature, not a
//! statistically rigorous predictive model, and it makes no accuracy claims.

/// Reference dataset index: loading, cohort grouping, and fallback lookup
pub mod reference;

/// Metric normalizer: unit conversions and session resolution
pub mod normalizer;

/// Comparator: percentile rank and relative delta against a cohort
pub mod comparator;

/// Trend projector: OLS fit, extrapolation, and plausibility clamping
pub mod projector;
