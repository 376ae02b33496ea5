// ABOUTME: Integration tests for reference dataset loading and cohort lookup
// ABOUTME: Covers schema reconciliation, the fallback ladder, and load failure modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use fitfuture::errors::EngineError;
use fitfuture::models::{ActivityLevel, AgeRange, DemographicBucket, MetricKey, Sex};
use fitfuture::reference::{DatasetSource, ReferenceIndex, SchemaMapping};

fn fixture_index(dir: &tempfile::TempDir) -> ReferenceIndex {
    ReferenceIndex::load(&common::fixture_sources(dir.path())).unwrap()
}

#[test]
fn exact_bucket_lookup_finds_gym_weight_cohort() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    let bucket = DemographicBucket::new(AgeRange::From25To34, Sex::Male, ActivityLevel::Moderate);
    let lookup = index.lookup(bucket, MetricKey::WeightKg).unwrap();

    assert!(!lookup.widened, "exact bucket should match without widening");
    assert_eq!(lookup.stats.len(), 5);
    assert!((lookup.stats.median() - 75.0).abs() < f64::EPSILON);
}

#[test]
fn ladder_drops_activity_when_exact_bucket_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    // Steps only come from sources without a (25-34, male, moderate) rung.
    let bucket = DemographicBucket::new(AgeRange::From25To34, Sex::Male, ActivityLevel::Moderate);
    let lookup = index.lookup(bucket, MetricKey::Steps).unwrap();

    assert!(lookup.widened);
    assert_eq!(lookup.matched.age, Some(AgeRange::From25To34));
    assert_eq!(lookup.matched.sex, Some(Sex::Male));
    assert_eq!(lookup.matched.activity, None);
    // hf365 male steps (8000, 9500, 7000) plus the survey's 30yo male (7600)
    assert_eq!(lookup.stats.len(), 4);
}

#[test]
fn ladder_drops_sex_when_band_has_no_matching_rows() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    // The 35-44 band only contains female rows across all fixtures.
    let bucket = DemographicBucket::new(AgeRange::From35To44, Sex::Male, ActivityLevel::Moderate);
    let lookup = index.lookup(bucket, MetricKey::WeightKg).unwrap();

    assert!(lookup.widened);
    assert_eq!(lookup.matched.age, Some(AgeRange::From35To44));
    assert_eq!(lookup.matched.sex, None);
}

#[test]
fn ladder_terminates_at_full_population() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    // No fixture rows fall in the 65+ band.
    let bucket = DemographicBucket::new(AgeRange::From65, Sex::Male, ActivityLevel::High);
    let lookup = index.lookup(bucket, MetricKey::WeightKg).unwrap();

    assert!(lookup.widened);
    assert!(lookup.matched.is_full_population());
    assert_eq!(lookup.stats.len(), index.population_size(MetricKey::WeightKg));
}

#[test]
fn metric_absent_from_every_source_is_no_cohort_data() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    let bucket = DemographicBucket::new(AgeRange::From25To34, Sex::Male, ActivityLevel::Moderate);
    let err = index.lookup(bucket, MetricKey::DistanceKm).unwrap_err();
    assert!(matches!(err, EngineError::NoCohortData { metric, .. } if metric == MetricKey::DistanceKm));
}

#[test]
fn rows_with_malformed_demographics_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    // Gym fixture has 11 rows but 2 lack age or sex; survey adds 6 weights.
    assert_eq!(index.population_size(MetricKey::WeightKg), 9 + 6);
}

#[test]
fn missing_required_column_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_hf365_csv_missing_column(dir.path());
    let sources = vec![DatasetSource::new(
        "health_tracking_365",
        path,
        SchemaMapping::health_tracking_365(),
    )];

    let err = ReferenceIndex::load(&sources).unwrap_err();
    match err {
        EngineError::DataLoad { source_name, reason } => {
            assert_eq!(source_name, "health_tracking_365");
            assert!(reason.contains("steps"), "reason should name the column: {reason}");
        }
        other => panic!("expected DataLoad, got {other:?}"),
    }
}

#[test]
fn unreadable_source_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let sources = vec![DatasetSource::new(
        "gym_members",
        dir.path().join("does_not_exist.csv"),
        SchemaMapping::gym_members(),
    )];
    assert!(matches!(
        ReferenceIndex::load(&sources),
        Err(EngineError::DataLoad { .. })
    ));
}

#[test]
fn session_hours_are_canonicalized_to_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let index = fixture_index(&dir);

    let bucket = DemographicBucket::new(AgeRange::From25To34, Sex::Male, ActivityLevel::Moderate);
    let lookup = index.lookup(bucket, MetricKey::DurationMin).unwrap();

    // Gym durations 1.0/1.2/0.75/1.5/1.0 hours land as minutes.
    assert_eq!(lookup.stats.len(), 5);
    assert!((lookup.stats.median() - 60.0).abs() < f64::EPSILON);
    assert_eq!(lookup.stats.values().first().copied(), Some(45.0));
    assert_eq!(lookup.stats.values().last().copied(), Some(90.0));
}
