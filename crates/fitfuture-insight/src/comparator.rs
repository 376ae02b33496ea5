// ABOUTME: Comparator computing percentile rank and relative delta against a reference cohort
// ABOUTME: Walks the bucket fallback ladder per metric and guards the zero-median delta
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Population comparison.
//!
//! Pure computation over a canonical vector and the shared reference index.
//! Metrics absent from the vector are omitted from the result, never
//! reported as zero. A metric with no population coverage at any ladder rung
//! is surfaced in [`ComparisonResult::uncovered`] instead of failing the
//! request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fitfuture_core::models::{CanonicalMetricVector, CohortKey, DemographicBucket, MetricKey};

use crate::reference::ReferenceIndex;

/// Comparison of one user metric against its matched cohort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricComparison {
    /// Metric being compared
    pub metric: MetricKey,
    /// User's canonical value
    pub user_value: f64,
    /// Median of the matched cohort sample
    pub cohort_median: f64,
    /// Mid-rank percentile of the user's value within the cohort, `[0, 1]`
    pub percentile_rank: f64,
    /// Signed relative delta `(user - median) / median`; `None` when the
    /// cohort median is zero and the delta is undefined
    pub relative_delta: Option<f64>,
    /// Number of samples in the matched cohort
    pub cohort_size: usize,
    /// Ladder rung the cohort was drawn from
    pub matched_cohort: CohortKey,
    /// Whether the ladder had to widen past the exact bucket
    pub widened: bool,
}

/// One comparison request's result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Timestamp the compared vector describes
    pub timestamp: DateTime<Utc>,
    /// Demographic bucket the comparison was requested for
    pub bucket: DemographicBucket,
    /// Per-metric comparisons, in canonical key order
    pub metrics: Vec<MetricComparison>,
    /// Metrics present in the vector but absent from the reference data at
    /// every ladder rung (indicates incomplete reference coverage)
    pub uncovered: Vec<MetricKey>,
}

/// Compare a canonical vector against the reference population.
///
/// For each metric present in the vector the cohort is found via the
/// fallback ladder, the percentile uses the mid-rank tie convention, and the
/// relative delta is guarded against a zero cohort median.
#[must_use]
pub fn compare(
    vector: &CanonicalMetricVector,
    bucket: DemographicBucket,
    index: &ReferenceIndex,
) -> ComparisonResult {
    let mut metrics = Vec::with_capacity(vector.metrics.len());
    let mut uncovered = Vec::new();

    for (&metric, &user_value) in &vector.metrics {
        let Ok(lookup) = index.lookup(bucket, metric) else {
            warn!(%metric, %bucket, "no reference coverage for metric at any ladder rung");
            uncovered.push(metric);
            continue;
        };

        let cohort_median = lookup.stats.median();
        let relative_delta = if cohort_median == 0.0 {
            debug!(%metric, "cohort median is zero, reporting delta as undefined");
            None
        } else {
            Some((user_value - cohort_median) / cohort_median)
        };

        metrics.push(MetricComparison {
            metric,
            user_value,
            cohort_median,
            percentile_rank: lookup.stats.percentile_rank(user_value),
            relative_delta,
            cohort_size: lookup.stats.len(),
            matched_cohort: lookup.matched,
            widened: lookup.widened,
        });
    }

    ComparisonResult {
        timestamp: vector.timestamp,
        bucket,
        metrics,
        uncovered,
    }
}
