// ABOUTME: CSV dataset loader with one schema mapping per heterogeneous source
// ABOUTME: Reconciles column names and units, groups samples under every fallback ladder rung
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Dataset loading.
//!
//! The three source datasets share no column names or units. Each source
//! carries a [`SchemaMapping`] that reconciles its schema in one place;
//! adding a fourth dataset means adding a mapping, not new branching logic.
//! Cell values go through the same conversion table as user log entries
//! ([`crate::normalizer::to_canonical`]), so population samples and user
//! values always land in the same canonical unit.

use std::collections::HashMap;
use std::path::PathBuf;

use csv::StringRecord;
use rayon::prelude::*;
use tracing::{debug, info};

use fitfuture_core::errors::{EngineError, EngineResult};
use fitfuture_core::models::{ActivityLevel, AgeRange, CohortKey, MetricKey, Sex};

use super::{CohortStats, ReferenceIndex};
use crate::normalizer::to_canonical;

/// How a source encodes activity level, if it does at all.
#[derive(Debug, Clone)]
pub enum ActivityColumn {
    /// A numeric sessions-per-week column (banded via
    /// [`ActivityLevel::from_weekly_sessions`])
    WeeklySessions(String),
    /// A categorical label column ("low", "moderate", ...)
    Label(String),
}

impl ActivityColumn {
    fn column(&self) -> &str {
        match self {
            Self::WeeklySessions(column) | Self::Label(column) => column,
        }
    }

    fn parse(&self, cell: &str) -> Option<ActivityLevel> {
        match self {
            Self::WeeklySessions(_) => {
                let sessions = cell.trim().parse::<f64>().ok()?;
                if !sessions.is_finite() || sessions < 0.0 {
                    return None;
                }
                Some(ActivityLevel::from_weekly_sessions(sessions.round() as u32))
            }
            Self::Label(_) => ActivityLevel::parse(cell),
        }
    }
}

/// One metric-bearing column: where it lives and what unit it is in.
#[derive(Debug, Clone)]
pub struct MetricColumn {
    /// Column header in the source file
    pub column: String,
    /// Canonical metric the column feeds
    pub metric: MetricKey,
    /// Unit tag of the raw values (must be in the conversion table)
    pub unit: String,
}

impl MetricColumn {
    fn new(column: &str, metric: MetricKey, unit: &str) -> Self {
        Self {
            column: column.to_owned(),
            metric,
            unit: unit.to_owned(),
        }
    }
}

/// Per-source schema reconciliation table.
#[derive(Debug, Clone)]
pub struct SchemaMapping {
    /// Column holding the respondent's age in years
    pub age_column: String,
    /// Column holding the respondent's sex
    pub sex_column: String,
    /// Activity level column, when the source has one
    pub activity_column: Option<ActivityColumn>,
    /// Metric-bearing columns with their units
    pub metric_columns: Vec<MetricColumn>,
}

impl SchemaMapping {
    /// Mapping for the gym members exercise tracking dataset.
    #[must_use]
    pub fn gym_members() -> Self {
        Self {
            age_column: "Age".to_owned(),
            sex_column: "Gender".to_owned(),
            activity_column: Some(ActivityColumn::WeeklySessions(
                "Workout_Frequency (days/week)".to_owned(),
            )),
            metric_columns: vec![
                MetricColumn::new("Session_Duration (hours)", MetricKey::DurationMin, "h"),
                MetricColumn::new("Calories_Burned", MetricKey::Calories, "kcal"),
                MetricColumn::new("Avg_BPM", MetricKey::HeartRateBpm, "bpm"),
                MetricColumn::new("Weight (kg)", MetricKey::WeightKg, "kg"),
            ],
        }
    }

    /// Mapping for the 365-day health and fitness tracking dataset.
    #[must_use]
    pub fn health_tracking_365() -> Self {
        Self {
            age_column: "age".to_owned(),
            sex_column: "gender".to_owned(),
            activity_column: None,
            metric_columns: vec![
                MetricColumn::new("exercise_minutes", MetricKey::DurationMin, "min"),
                MetricColumn::new("steps", MetricKey::Steps, "steps"),
                MetricColumn::new("sleep_hours", MetricKey::SleepHours, "h"),
            ],
        }
    }

    /// Mapping for the health and fitness survey dataset.
    #[must_use]
    pub fn health_fitness_survey() -> Self {
        Self {
            age_column: "age".to_owned(),
            sex_column: "gender".to_owned(),
            activity_column: Some(ActivityColumn::Label("intensity".to_owned())),
            metric_columns: vec![
                MetricColumn::new("duration_minutes", MetricKey::DurationMin, "min"),
                MetricColumn::new("calories_burned", MetricKey::Calories, "kcal"),
                MetricColumn::new("avg_heart_rate", MetricKey::HeartRateBpm, "bpm"),
                MetricColumn::new("weight_kg", MetricKey::WeightKg, "kg"),
                MetricColumn::new("daily_steps", MetricKey::Steps, "steps"),
                MetricColumn::new("hours_sleep", MetricKey::SleepHours, "h"),
            ],
        }
    }
}

/// One reference dataset: a name for diagnostics, a file, and its mapping.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    /// Short source name used in logs and errors
    pub name: String,
    /// Path to the CSV file
    pub path: PathBuf,
    /// Schema reconciliation for this source
    pub mapping: SchemaMapping,
}

impl DatasetSource {
    /// Create a dataset source.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, mapping: SchemaMapping) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mapping,
        }
    }
}

type GroupedSamples = HashMap<CohortKey, HashMap<MetricKey, Vec<f64>>>;

/// Resolved column indexes for one source file.
struct ColumnPlan {
    age: usize,
    sex: usize,
    activity: Option<usize>,
    metrics: Vec<(usize, MetricKey, String)>,
}

impl ColumnPlan {
    fn resolve(source: &DatasetSource, headers: &StringRecord) -> EngineResult<Self> {
        let find = |column: &str| -> EngineResult<usize> {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| EngineError::DataLoad {
                    source_name: source.name.clone(),
                    reason: format!("missing required column '{column}'"),
                })
        };

        let mapping = &source.mapping;
        let activity = match &mapping.activity_column {
            Some(column) => Some(find(column.column())?),
            None => None,
        };
        let metrics = mapping
            .metric_columns
            .iter()
            .map(|metric_column| {
                Ok((
                    find(&metric_column.column)?,
                    metric_column.metric,
                    metric_column.unit.clone(),
                ))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self {
            age: find(&mapping.age_column)?,
            sex: find(&mapping.sex_column)?,
            activity,
            metrics,
        })
    }
}

/// The ladder rungs a row's samples are inserted under. Rows without an
/// activity level only populate the rungs that do not constrain it.
fn insertion_keys(age: AgeRange, sex: Sex, activity: Option<ActivityLevel>) -> Vec<CohortKey> {
    let mut keys = Vec::with_capacity(4);
    if let Some(activity) = activity {
        keys.push(CohortKey {
            age: Some(age),
            sex: Some(sex),
            activity: Some(activity),
        });
    }
    keys.push(CohortKey {
        age: Some(age),
        sex: Some(sex),
        activity: None,
    });
    keys.push(CohortKey {
        age: Some(age),
        sex: None,
        activity: None,
    });
    keys.push(CohortKey::FULL_POPULATION);
    keys
}

fn load_source(source: &DatasetSource) -> EngineResult<GroupedSamples> {
    let mut reader = csv::Reader::from_path(&source.path).map_err(|err| EngineError::DataLoad {
        source_name: source.name.clone(),
        reason: err.to_string(),
    })?;
    let headers = reader
        .headers()
        .map_err(|err| EngineError::DataLoad {
            source_name: source.name.clone(),
            reason: err.to_string(),
        })?
        .clone();
    let plan = ColumnPlan::resolve(source, &headers)?;

    let mut grouped = GroupedSamples::new();
    let mut rows = 0_usize;
    let mut skipped = 0_usize;

    for record in reader.records() {
        let record = record.map_err(|err| EngineError::DataLoad {
            source_name: source.name.clone(),
            reason: err.to_string(),
        })?;
        rows += 1;

        // The source data has its share of blank and malformed demographic
        // cells; those rows are skipped rather than failing the load.
        let age = record
            .get(plan.age)
            .and_then(|cell| cell.trim().parse::<f64>().ok())
            .filter(|age| age.is_finite() && *age >= 0.0)
            .map(|age| AgeRange::from_age(age.round() as u32));
        let sex = record.get(plan.sex).and_then(Sex::parse);
        let (Some(age), Some(sex)) = (age, sex) else {
            skipped += 1;
            continue;
        };
        let activity = plan.activity.and_then(|idx| {
            let column = source.mapping.activity_column.as_ref()?;
            record.get(idx).and_then(|cell| column.parse(cell))
        });

        let keys = insertion_keys(age, sex, activity);
        for (idx, metric, unit) in &plan.metrics {
            let Some(raw) = record
                .get(*idx)
                .and_then(|cell| cell.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
            else {
                continue;
            };
            // Mapping units are part of the mapping table; an unknown unit
            // here is a broken mapping, not a bad row.
            let value = to_canonical(*metric, unit, raw).map_err(|err| EngineError::DataLoad {
                source_name: source.name.clone(),
                reason: err.to_string(),
            })?;
            for key in &keys {
                grouped
                    .entry(*key)
                    .or_default()
                    .entry(*metric)
                    .or_default()
                    .push(value);
            }
        }
    }

    debug!(
        source = %source.name,
        rows,
        skipped,
        "loaded reference dataset source"
    );
    Ok(grouped)
}

impl ReferenceIndex {
    /// Load and index the reference datasets.
    ///
    /// Sources are parsed in parallel, then merged into a single index with
    /// sorted sample vectors per (cohort, metric) pair.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DataLoad`] if any source is unreadable,
    /// malformed, or missing a column its mapping requires.
    pub fn load(sources: &[DatasetSource]) -> EngineResult<Self> {
        let per_source = sources
            .par_iter()
            .map(load_source)
            .collect::<EngineResult<Vec<_>>>()?;

        let mut merged: GroupedSamples = HashMap::new();
        for grouped in per_source {
            for (key, metrics) in grouped {
                let target = merged.entry(key).or_default();
                for (metric, mut values) in metrics {
                    target.entry(metric).or_default().append(&mut values);
                }
            }
        }

        let cohorts = merged
            .into_iter()
            .map(|(key, metrics)| {
                let stats = metrics
                    .into_iter()
                    .filter(|(_, values)| !values.is_empty())
                    .map(|(metric, values)| (metric, CohortStats::from_unsorted(values)))
                    .collect();
                (key, stats)
            })
            .collect::<HashMap<_, _>>();

        let index = Self::from_cohorts(cohorts);
        info!(
            sources = sources.len(),
            cohorts = index.cohort_count(),
            "reference index built"
        );
        Ok(index)
    }
}
