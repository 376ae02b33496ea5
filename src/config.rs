// ABOUTME: Engine configuration with defaults and FITFUTURE_* environment overrides
// ABOUTME: Declares the three standard reference dataset sources and tuning knobs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Engine configuration.
//!
//! Environment-driven: every knob has a sensible default and a `FITFUTURE_*`
//! override. Dataset sources default to the three standard files under the
//! data directory.

use std::env;
use std::path::Path;

use fitfuture_core::constants::{
    DEFAULT_MIN_HISTORY_POINTS, DEFAULT_PROJECTION_STEP_DAYS, DEFAULT_STALENESS_DAYS,
};
use fitfuture_insight::reference::{DatasetSource, SchemaMapping};

/// Environment variable naming the reference data directory.
pub const ENV_DATA_DIR: &str = "FITFUTURE_DATA_DIR";
/// Environment variable overriding the staleness window, in days.
pub const ENV_STALENESS_DAYS: &str = "FITFUTURE_STALENESS_DAYS";
/// Environment variable overriding the minimum history threshold.
pub const ENV_MIN_HISTORY_POINTS: &str = "FITFUTURE_MIN_HISTORY_POINTS";
/// Environment variable overriding the projection grid step, in days.
pub const ENV_PROJECTION_STEP_DAYS: &str = "FITFUTURE_PROJECTION_STEP_DAYS";

/// The three standard reference dataset sources under a data directory.
#[must_use]
pub fn standard_sources(data_dir: &Path) -> Vec<DatasetSource> {
    vec![
        DatasetSource::new(
            "gym_members",
            data_dir.join("gym_members_exercise_tracking.csv"),
            SchemaMapping::gym_members(),
        ),
        DatasetSource::new(
            "health_tracking_365",
            data_dir.join("health_fitness_tracking_365days.csv"),
            SchemaMapping::health_tracking_365(),
        ),
        DatasetSource::new(
            "health_fitness_survey",
            data_dir.join("health_fitness_dataset.csv"),
            SchemaMapping::health_fitness_survey(),
        ),
    ]
}

/// Configuration for [`crate::engine::AnalyticsEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Reference dataset sources to load and index
    pub datasets: Vec<DatasetSource>,
    /// Entries older than this many days drop out of the "current" vector
    pub staleness_days: i64,
    /// Minimum history points per metric before a trend is fitted
    pub min_history_points: usize,
    /// Spacing between projected points, in days
    pub projection_step_days: i64,
}

impl EngineConfig {
    /// Configuration with default tuning over explicit dataset sources.
    #[must_use]
    pub fn with_datasets(datasets: Vec<DatasetSource>) -> Self {
        Self {
            datasets,
            staleness_days: DEFAULT_STALENESS_DAYS,
            min_history_points: DEFAULT_MIN_HISTORY_POINTS,
            projection_step_days: DEFAULT_PROJECTION_STEP_DAYS,
        }
    }

    /// Configuration from the environment, defaulting the data directory to
    /// `./data` and every knob to its constant default.
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir = env::var(ENV_DATA_DIR).unwrap_or_else(|_| "data".to_owned());
        Self {
            datasets: standard_sources(Path::new(&data_dir)),
            staleness_days: env_parsed(ENV_STALENESS_DAYS, DEFAULT_STALENESS_DAYS),
            min_history_points: env_parsed(ENV_MIN_HISTORY_POINTS, DEFAULT_MIN_HISTORY_POINTS),
            projection_step_days: env_parsed(ENV_PROJECTION_STEP_DAYS, DEFAULT_PROJECTION_STEP_DAYS),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
