// ABOUTME: Reference dataset index keyed by demographic cohort and metric
// ABOUTME: Sorted cohort samples with mid-rank percentile lookup and the bucket fallback ladder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! The reference dataset index.
//!
//! Built once from the source datasets (see [`loader`]), then treated as
//! read-only and shared across any number of concurrent comparisons. Samples
//! are grouped under every rung of the fallback ladder at load time, so a
//! lookup is a map probe plus binary searches over a sorted slice.

use std::collections::HashMap;

use tracing::debug;

use fitfuture_core::errors::{EngineError, EngineResult};
use fitfuture_core::models::{CohortKey, DemographicBucket, MetricKey};

/// Dataset loading: per-source schema mappings and CSV ingestion
pub mod loader;

pub use loader::{ActivityColumn, DatasetSource, MetricColumn, SchemaMapping};

/// The sorted sample of population values for one (cohort, metric) pair.
///
/// Immutable after load; all queries are binary searches.
#[derive(Debug, Clone)]
pub struct CohortStats {
    values: Vec<f64>,
}

impl CohortStats {
    pub(crate) fn from_unsorted(mut values: Vec<f64>) -> Self {
        values.sort_unstable_by(f64::total_cmp);
        Self { values }
    }

    /// Number of samples in the cohort.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the cohort has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The sorted sample values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Median of the cohort sample. Zero for an empty cohort, which callers
    /// rule out by construction (empty cohorts are never stored).
    #[must_use]
    pub fn median(&self) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return 0.0;
        }
        if n % 2 == 1 {
            self.values[n / 2]
        } else {
            f64::midpoint(self.values[n / 2 - 1], self.values[n / 2])
        }
    }

    /// Mid-rank percentile of `value` within the cohort, in `[0, 1]`:
    /// the fraction of samples strictly below plus half the ties.
    #[must_use]
    pub fn percentile_rank(&self, value: f64) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return 0.0;
        }
        let below = self.values.partition_point(|sample| *sample < value);
        let up_to = self.values.partition_point(|sample| *sample <= value);
        let ties = up_to - below;
        (below as f64 + 0.5 * ties as f64) / n as f64
    }
}

/// A successful cohort lookup: the stats plus which ladder rung matched.
#[derive(Debug)]
pub struct CohortLookup<'a> {
    /// Sorted cohort sample for the metric
    pub stats: &'a CohortStats,
    /// The rung that produced a non-empty cohort
    pub matched: CohortKey,
    /// Whether any widening was needed (false for an exact bucket match)
    pub widened: bool,
}

/// Queryable index over the merged reference datasets.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    cohorts: HashMap<CohortKey, HashMap<MetricKey, CohortStats>>,
}

impl ReferenceIndex {
    pub(crate) fn from_cohorts(
        cohorts: HashMap<CohortKey, HashMap<MetricKey, CohortStats>>,
    ) -> Self {
        Self { cohorts }
    }

    /// Number of distinct cohort keys (all rungs included).
    #[must_use]
    pub fn cohort_count(&self) -> usize {
        self.cohorts.len()
    }

    /// Total full-population sample count for a metric, if any.
    #[must_use]
    pub fn population_size(&self, metric: MetricKey) -> usize {
        self.cohorts
            .get(&CohortKey::FULL_POPULATION)
            .and_then(|metrics| metrics.get(&metric))
            .map_or(0, CohortStats::len)
    }

    /// Find the reference cohort for a bucket and metric.
    ///
    /// Walks the bucket's fallback ladder (exact, then drop activity level,
    /// then sex, then age) and returns the first non-empty cohort, so
    /// comparisons never fail outright for lack of an exact demographic
    /// match.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoCohortData`] only when even the
    /// full-population rung has no samples for the metric, which indicates a
    /// corrupt or incomplete reference dataset.
    pub fn lookup(
        &self,
        bucket: DemographicBucket,
        metric: MetricKey,
    ) -> EngineResult<CohortLookup<'_>> {
        for (rung, key) in bucket.fallback_ladder().into_iter().enumerate() {
            if let Some(stats) = self
                .cohorts
                .get(&key)
                .and_then(|metrics| metrics.get(&metric))
            {
                if !stats.is_empty() {
                    if rung > 0 {
                        debug!(%bucket, %metric, matched = %key, "cohort lookup widened");
                    }
                    return Ok(CohortLookup {
                        stats,
                        matched: key,
                        widened: rung > 0,
                    });
                }
            }
        }
        Err(EngineError::NoCohortData {
            metric,
            key: CohortKey::FULL_POPULATION,
        })
    }
}
