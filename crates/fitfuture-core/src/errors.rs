// ABOUTME: Unified error types for the FitFuture analytics engine
// ABOUTME: Defines EngineError with per-failure-mode variants and the EngineResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Engine error types.
//!
//! Every failure mode has a defined degraded-but-useful fallback except
//! dataset loading at startup: [`EngineError::DataLoad`] must prevent the
//! engine from serving comparisons until the source data is fixed. The other
//! variants are recovered close to where they arise (per-entry rejection,
//! per-metric omission, undefined delta) and never abort a whole request.

use uuid::Uuid;

use crate::models::{CohortKey, MetricKey};

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error types for the comparison and projection engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A reference dataset source is unreadable or missing required columns.
    #[error("failed to load reference dataset '{source_name}': {reason}")]
    DataLoad {
        /// Name of the dataset source that failed
        source_name: String,
        /// What went wrong (I/O, parse, or schema mismatch)
        reason: String,
    },

    /// No cohort samples exist for a metric, even at the full-population
    /// rung of the fallback ladder. Indicates a corrupt or incomplete
    /// reference dataset.
    #[error("no cohort samples for metric '{metric}' at any rung down to {key}")]
    NoCohortData {
        /// Metric with no population coverage
        metric: MetricKey,
        /// The widest rung that was tried
        key: CohortKey,
    },

    /// A log entry carries a unit tag the conversion table does not know.
    /// Reported per entry; never aborts normalization of the rest.
    #[error("unknown unit tag '{unit}' for metric '{metric}'")]
    UnknownUnit {
        /// Metric the entry was logged against
        metric: MetricKey,
        /// The unrecognized unit tag as entered
        unit: String,
    },

    /// Too few history points to fit a trend for a metric. Recovered by
    /// omitting the metric from the projection.
    #[error("metric '{metric}' has {points} history points, {required} required")]
    InsufficientHistory {
        /// Metric that was skipped
        metric: MetricKey,
        /// Points available
        points: usize,
        /// Points required
        required: usize,
    },

    /// Cohort median is zero, so the relative delta is undefined. Recovered
    /// locally; the comparison reports the delta as undefined instead.
    #[error("cohort median is zero for metric '{metric}', relative delta undefined")]
    DivisionGuard {
        /// Metric whose cohort median is zero
        metric: MetricKey,
    },

    /// The user has no profile, so no demographic bucket can be assigned.
    #[error("no profile found for user '{user_id}'")]
    MissingProfile {
        /// User the comparison or projection was requested for
        user_id: Uuid,
    },

    /// The external record store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A background task (reference reload) was cancelled or panicked.
    #[error("reload task failed: {0}")]
    ReloadTask(String),
}
