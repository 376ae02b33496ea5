// ABOUTME: Integration tests for the population comparator
// ABOUTME: Covers mid-rank percentiles, relative deltas, the zero-median guard, and omissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{TimeZone, Utc};
use fitfuture::comparator::compare;
use fitfuture::models::{
    ActivityLevel, AgeRange, CanonicalMetricVector, DemographicBucket, MetricKey, Sex,
};
use fitfuture::normalizer::to_canonical;
use fitfuture::reference::{DatasetSource, ReferenceIndex, SchemaMapping};

fn moderate_male_25_34() -> DemographicBucket {
    DemographicBucket::new(AgeRange::From25To34, Sex::Male, ActivityLevel::Moderate)
}

fn vector_with(metrics: &[(MetricKey, f64)]) -> CanonicalMetricVector {
    let timestamp = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let mut vector = CanonicalMetricVector::new(timestamp, moderate_male_25_34());
    for (metric, value) in metrics {
        vector.metrics.insert(*metric, *value);
    }
    vector
}

#[test]
fn pound_logged_weight_compares_against_kilogram_cohort() {
    let dir = tempfile::tempdir().unwrap();
    let index = ReferenceIndex::load(&common::fixture_sources(dir.path())).unwrap();

    // 160 lb normalizes to ~72.57 kg; cohort is 70/72/75/78/80 (median 75).
    let weight_kg = to_canonical(MetricKey::WeightKg, "lb", 160.0).unwrap();
    let vector = vector_with(&[(MetricKey::WeightKg, weight_kg)]);
    let result = compare(&vector, moderate_male_25_34(), &index);

    assert_eq!(result.metrics.len(), 1);
    let weight = &result.metrics[0];
    assert!((weight.user_value - 72.574_779_2).abs() < 1e-6);
    assert!((weight.percentile_rank - 0.4).abs() < f64::EPSILON);
    let delta = weight.relative_delta.unwrap();
    assert!((delta - (-0.032_336)).abs() < 1e-4);
    assert_eq!(weight.cohort_size, 5);
    assert!(!weight.widened);
}

#[test]
fn value_equal_to_cohort_median_ranks_at_half() {
    let dir = tempfile::tempdir().unwrap();
    let index = ReferenceIndex::load(&common::fixture_sources(dir.path())).unwrap();

    let vector = vector_with(&[(MetricKey::WeightKg, 75.0)]);
    let result = compare(&vector, moderate_male_25_34(), &index);

    let weight = &result.metrics[0];
    // Two below, one tie at mid-rank weight: (2 + 0.5) / 5 = 0.5
    assert!((weight.percentile_rank - 0.5).abs() < 1e-9);
    assert!(weight.relative_delta.unwrap().abs() < 1e-9);
}

#[test]
fn absent_metrics_are_omitted_not_zeroed() {
    let dir = tempfile::tempdir().unwrap();
    let index = ReferenceIndex::load(&common::fixture_sources(dir.path())).unwrap();

    let vector = vector_with(&[(MetricKey::WeightKg, 75.0)]);
    let result = compare(&vector, moderate_male_25_34(), &index);

    assert_eq!(result.metrics.len(), 1);
    assert!(result
        .metrics
        .iter()
        .all(|comparison| comparison.metric == MetricKey::WeightKg));
}

#[test]
fn metric_without_reference_coverage_is_surfaced_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let index = ReferenceIndex::load(&common::fixture_sources(dir.path())).unwrap();

    let vector = vector_with(&[
        (MetricKey::WeightKg, 75.0),
        (MetricKey::DistanceKm, 5.0),
    ]);
    let result = compare(&vector, moderate_male_25_34(), &index);

    assert_eq!(result.metrics.len(), 1);
    assert_eq!(result.uncovered, vec![MetricKey::DistanceKm]);
}

#[test]
fn zero_cohort_median_reports_delta_as_undefined() {
    let dir = tempfile::tempdir().unwrap();
    // A cohort whose step counts are all zero has a zero median.
    let path = dir.path().join("health_fitness_tracking_365days.csv");
    std::fs::write(
        &path,
        "age,gender,steps,sleep_hours,exercise_minutes\n\
         27,M,0,7.0,30\n\
         29,M,0,6.5,45\n\
         31,M,0,7.5,60\n",
    )
    .unwrap();
    let sources = vec![DatasetSource::new(
        "health_tracking_365",
        path,
        SchemaMapping::health_tracking_365(),
    )];
    let index = ReferenceIndex::load(&sources).unwrap();

    let vector = vector_with(&[(MetricKey::Steps, 4000.0)]);
    let result = compare(&vector, moderate_male_25_34(), &index);

    let steps = &result.metrics[0];
    assert_eq!(steps.relative_delta, None);
    assert!((steps.percentile_rank - 1.0).abs() < f64::EPSILON);
}

#[test]
fn widened_lookup_is_flagged_in_the_result() {
    let dir = tempfile::tempdir().unwrap();
    let index = ReferenceIndex::load(&common::fixture_sources(dir.path())).unwrap();

    let vector = vector_with(&[(MetricKey::Steps, 8_000.0)]);
    let result = compare(&vector, moderate_male_25_34(), &index);

    let steps = &result.metrics[0];
    assert!(steps.widened);
    assert_eq!(steps.matched_cohort.activity, None);
}
