// ABOUTME: Metric normalizer converting unit-tagged raw log entries into canonical vectors
// ABOUTME: Table-driven unit conversions, last-write-wins session resolution, staleness windowing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Metric normalization.
//!
//! Conversions are table-driven: every supported unit tag appears in
//! [`UNIT_CONVERSIONS`], and an unrecognized tag rejects that entry with
//! [`EngineError::UnknownUnit`]. Passing an untagged raw number through
//! would corrupt every downstream percentile.
//! Normalization is a pure function: the same entries always produce the
//! same vector.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use fitfuture_core::constants::DEFAULT_STALENESS_DAYS;
use fitfuture_core::errors::{EngineError, EngineResult};
use fitfuture_core::models::{CanonicalMetricVector, DemographicBucket, MetricKey, RawLogEntry};

/// Multiplicative conversion factors from a unit tag into the metric's
/// canonical unit. Tags are matched case-insensitively after trimming.
pub const UNIT_CONVERSIONS: &[(MetricKey, &str, f64)] = &[
    (MetricKey::DurationMin, "min", 1.0),
    (MetricKey::DurationMin, "minutes", 1.0),
    (MetricKey::DurationMin, "h", 60.0),
    (MetricKey::DurationMin, "hr", 60.0),
    (MetricKey::DurationMin, "hours", 60.0),
    (MetricKey::DurationMin, "s", 1.0 / 60.0),
    (MetricKey::DurationMin, "sec", 1.0 / 60.0),
    (MetricKey::Calories, "kcal", 1.0),
    (MetricKey::Calories, "cal", 0.001),
    (MetricKey::Calories, "kj", 0.239_006),
    (MetricKey::HeartRateBpm, "bpm", 1.0),
    (MetricKey::WeightKg, "kg", 1.0),
    (MetricKey::WeightKg, "g", 0.001),
    (MetricKey::WeightKg, "lb", 0.453_592_37),
    (MetricKey::WeightKg, "lbs", 0.453_592_37),
    (MetricKey::WeightKg, "st", 6.350_293_18),
    (MetricKey::Steps, "steps", 1.0),
    (MetricKey::Steps, "count", 1.0),
    (MetricKey::SleepHours, "h", 1.0),
    (MetricKey::SleepHours, "hr", 1.0),
    (MetricKey::SleepHours, "hours", 1.0),
    (MetricKey::SleepHours, "min", 1.0 / 60.0),
    (MetricKey::SleepHours, "minutes", 1.0 / 60.0),
    (MetricKey::DistanceKm, "km", 1.0),
    (MetricKey::DistanceKm, "m", 0.001),
    (MetricKey::DistanceKm, "mi", 1.609_344),
];

/// Convert a value from its tagged unit into the metric's canonical unit.
///
/// # Errors
///
/// Returns [`EngineError::UnknownUnit`] when the tag is not in the
/// conversion table for this metric.
pub fn to_canonical(metric: MetricKey, unit: &str, value: f64) -> EngineResult<f64> {
    let tag = unit.trim().to_ascii_lowercase();
    UNIT_CONVERSIONS
        .iter()
        .find(|(key, known, _)| *key == metric && *known == tag)
        .map_or_else(
            || {
                Err(EngineError::UnknownUnit {
                    metric,
                    unit: unit.to_owned(),
                })
            },
            |(_, _, factor)| Ok(value * factor),
        )
}

/// An entry the normalizer could not convert, with the reason.
#[derive(Debug)]
pub struct RejectedEntry {
    /// The offending entry as submitted
    pub entry: RawLogEntry,
    /// Why it was rejected
    pub error: EngineError,
}

/// Result of normalizing one logical session into a canonical vector.
#[derive(Debug)]
pub struct NormalizeOutcome {
    /// The canonical vector; metrics absent when nothing valid was logged
    pub vector: CanonicalMetricVector,
    /// Entries rejected per-entry (unknown unit tags)
    pub rejected: Vec<RejectedEntry>,
}

/// Result of normalizing a user's full history into daily vectors.
#[derive(Debug)]
pub struct HistoryOutcome {
    /// One vector per calendar day with data, ascending by timestamp
    pub vectors: Vec<CanonicalMetricVector>,
    /// Entries rejected per-entry (unknown unit tags)
    pub rejected: Vec<RejectedEntry>,
}

/// Converts heterogeneous raw log entries into canonical metric vectors.
#[derive(Debug, Clone)]
pub struct Normalizer {
    staleness_window: Duration,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STALENESS_DAYS)
    }
}

impl Normalizer {
    /// Create a normalizer with the given staleness window in days.
    #[must_use]
    pub fn new(staleness_days: i64) -> Self {
        Self {
            staleness_window: Duration::days(staleness_days),
        }
    }

    /// Build the "current" canonical vector as of a point in time.
    ///
    /// Entries newer than `as_of` or older than the staleness window are
    /// excluded (stale entries still feed [`Self::normalize_history`]).
    /// Multiple entries for the same metric resolve last-write-wins by
    /// timestamp. Unknown unit tags reject only the offending entry.
    #[must_use]
    pub fn normalize(
        &self,
        entries: &[RawLogEntry],
        bucket: DemographicBucket,
        as_of: DateTime<Utc>,
    ) -> NormalizeOutcome {
        let window_start = as_of - self.staleness_window;
        let mut rejected = Vec::new();
        let mut latest: BTreeMap<MetricKey, (DateTime<Utc>, f64)> = BTreeMap::new();

        for entry in entries {
            if entry.timestamp > as_of || entry.timestamp < window_start {
                continue;
            }
            match to_canonical(entry.metric, &entry.unit, entry.value) {
                Ok(value) => {
                    let candidate = (entry.timestamp, value);
                    latest
                        .entry(entry.metric)
                        .and_modify(|current| {
                            if candidate.0 >= current.0 {
                                *current = candidate;
                            }
                        })
                        .or_insert(candidate);
                }
                Err(error) => {
                    debug!(
                        metric = %entry.metric,
                        unit = %entry.unit,
                        "rejecting log entry with unknown unit tag"
                    );
                    rejected.push(RejectedEntry {
                        entry: entry.clone(),
                        error,
                    });
                }
            }
        }

        let mut vector = CanonicalMetricVector::new(as_of, bucket);
        vector.metrics = latest
            .into_iter()
            .map(|(metric, (_, value))| (metric, value))
            .collect();

        NormalizeOutcome { vector, rejected }
    }

    /// Build the user's historical series, one vector per calendar day.
    ///
    /// No staleness filtering: old entries are exactly what the trend
    /// projector needs. Within a day, last-write-wins per metric.
    #[must_use]
    pub fn normalize_history(
        &self,
        entries: &[RawLogEntry],
        bucket: DemographicBucket,
    ) -> HistoryOutcome {
        let mut rejected = Vec::new();
        let mut days: BTreeMap<NaiveDate, BTreeMap<MetricKey, (DateTime<Utc>, f64)>> =
            BTreeMap::new();

        for entry in entries {
            match to_canonical(entry.metric, &entry.unit, entry.value) {
                Ok(value) => {
                    let candidate = (entry.timestamp, value);
                    days.entry(entry.timestamp.date_naive())
                        .or_default()
                        .entry(entry.metric)
                        .and_modify(|current| {
                            if candidate.0 >= current.0 {
                                *current = candidate;
                            }
                        })
                        .or_insert(candidate);
                }
                Err(error) => rejected.push(RejectedEntry {
                    entry: entry.clone(),
                    error,
                }),
            }
        }

        let vectors = days
            .into_iter()
            .map(|(day, metrics)| {
                let timestamp = day.and_time(NaiveTime::MIN).and_utc();
                let mut vector = CanonicalMetricVector::new(timestamp, bucket);
                vector.metrics = metrics
                    .into_iter()
                    .map(|(metric, (_, value))| (metric, value))
                    .collect();
                vector
            })
            .collect();

        HistoryOutcome { vectors, rejected }
    }
}
