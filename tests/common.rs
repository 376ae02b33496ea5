// ABOUTME: Shared fixtures for integration tests - writes the three reference CSV schemas
// ABOUTME: Provides deterministic cohort samples with known medians and percentiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

#![allow(dead_code)] // Each integration test binary uses a subset of the fixtures
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use fitfuture::reference::{DatasetSource, SchemaMapping};

/// Gym members dataset fixture.
///
/// The (25-34, male, moderate) weight cohort is 70/72/75/78/80 kg:
/// median 75, so a 72.57 kg user sits at mid-rank percentile 0.4 with a
/// relative delta of about -0.032.
/// The 35-44 female rows all train 3 days/week (moderate), so a
/// high-activity lookup for that bucket must widen by dropping activity.
pub fn write_gym_csv(dir: &Path) -> PathBuf {
    let path = dir.join("gym_members_exercise_tracking.csv");
    let content = "\
Age,Gender,Weight (kg),Session_Duration (hours),Calories_Burned,Avg_BPM,Workout_Frequency (days/week)
26,Male,70,1.0,600,140,4
28,Male,72,1.2,700,145,4
30,Male,75,0.75,500,150,5
31,Male,78,1.5,900,142,3
33,Male,80,1.0,650,148,4
36,Female,62,0.8,420,138,3
39,Female,65,1.1,610,141,3
42,Female,68,0.9,480,144,3
27,Female,58,1.0,520,139,2
,Male,90,1.0,700,150,4
29,,85,1.0,680,151,4
";
    fs::write(&path, content).unwrap();
    path
}

/// 365-day tracking dataset fixture. No activity column; steps and sleep
/// only exist in this source, covering ages 25-34 of both sexes.
pub fn write_hf365_csv(dir: &Path) -> PathBuf {
    let path = dir.join("health_fitness_tracking_365days.csv");
    let content = "\
age,gender,steps,sleep_hours,exercise_minutes
25,M,8000,7.0,30
27,M,9500,6.5,45
31,M,7000,7.5,60
26,F,10000,8.0,40
29,F,8500,7.2,35
33,F,9000,6.8,50
";
    fs::write(&path, content).unwrap();
    path
}

/// Health and fitness survey fixture with a categorical intensity column.
///
/// No (25-34, male, moderate) rows, so the gym fixture's weight cohort for
/// that bucket stays exactly 70/72/75/78/80.
pub fn write_survey_csv(dir: &Path) -> PathBuf {
    let path = dir.join("health_fitness_dataset.csv");
    let content = "\
age,gender,duration_minutes,calories_burned,avg_heart_rate,weight_kg,daily_steps,hours_sleep,intensity
30,M,60,600,142,76,7600,6.9,High
45,M,45,450,135,74,8200,7.1,Medium
48,M,40,380,131,82,6400,6.5,Low
28,F,30,300,128,61,9100,7.8,Low
35,F,50,520,137,64,8800,7.3,Medium
52,F,35,340,129,70,7100,7.0,Medium
";
    fs::write(&path, content).unwrap();
    path
}

/// A broken 365-day fixture missing its `steps` column.
pub fn write_hf365_csv_missing_column(dir: &Path) -> PathBuf {
    let path = dir.join("health_fitness_tracking_365days.csv");
    let content = "\
age,gender,sleep_hours,exercise_minutes
25,M,7.0,30
";
    fs::write(&path, content).unwrap();
    path
}

/// All three fixture sources with their standard schema mappings.
pub fn fixture_sources(dir: &Path) -> Vec<DatasetSource> {
    vec![
        DatasetSource::new("gym_members", write_gym_csv(dir), SchemaMapping::gym_members()),
        DatasetSource::new(
            "health_tracking_365",
            write_hf365_csv(dir),
            SchemaMapping::health_tracking_365(),
        ),
        DatasetSource::new(
            "health_fitness_survey",
            write_survey_csv(dir),
            SchemaMapping::health_fitness_survey(),
        ),
    ]
}
