// ABOUTME: Metric, log entry, and demographic cohort models for the engine
// ABOUTME: Defines the canonical metric set, unit-tagged raw entries, and the bucket fallback ladder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Core data model: canonical metrics, raw log entries, and demographic cohorts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{plausible, AGE_BAND_EDGES};

/// The fixed set of canonical metric keys.
///
/// Every key carries exactly one canonical unit; the normalizer converts all
/// recognized unit tags into it before anything downstream sees the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Workout duration in minutes
    DurationMin,
    /// Energy expenditure in kilocalories
    Calories,
    /// Heart rate in beats per minute
    HeartRateBpm,
    /// Body weight in kilograms
    WeightKg,
    /// Step count
    Steps,
    /// Sleep in hours
    SleepHours,
    /// Distance in kilometers
    DistanceKm,
}

impl MetricKey {
    /// All canonical metric keys, in stable order.
    pub const ALL: [Self; 7] = [
        Self::DurationMin,
        Self::Calories,
        Self::HeartRateBpm,
        Self::WeightKg,
        Self::Steps,
        Self::SleepHours,
        Self::DistanceKm,
    ];

    /// Canonical key name as it appears in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DurationMin => "duration_min",
            Self::Calories => "calories",
            Self::HeartRateBpm => "heart_rate_bpm",
            Self::WeightKg => "weight_kg",
            Self::Steps => "steps",
            Self::SleepHours => "sleep_hours",
            Self::DistanceKm => "distance_km",
        }
    }

    /// Unit tag of the canonical unit for this metric.
    #[must_use]
    pub const fn canonical_unit(self) -> &'static str {
        match self {
            Self::DurationMin => "min",
            Self::Calories => "kcal",
            Self::HeartRateBpm => "bpm",
            Self::WeightKg => "kg",
            Self::Steps => "steps",
            Self::SleepHours => "h",
            Self::DistanceKm => "km",
        }
    }

    /// Physically plausible `(min, max)` range, used to clamp projections.
    #[must_use]
    pub const fn plausible_range(self) -> (f64, f64) {
        match self {
            Self::DurationMin => plausible::DURATION_MIN,
            Self::Calories => plausible::CALORIES,
            Self::HeartRateBpm => plausible::HEART_RATE_BPM,
            Self::WeightKg => plausible::WEIGHT_KG,
            Self::Steps => plausible::STEPS,
            Self::SleepHours => plausible::SLEEP_HOURS,
            Self::DistanceKm => plausible::DISTANCE_KM,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-submitted record, immutable once stored.
///
/// The unit tag is free-form at this boundary; the normalizer either
/// recognizes it via the conversion table or rejects the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    /// When the value was logged
    pub timestamp: DateTime<Utc>,
    /// Which canonical metric this entry feeds
    pub metric: MetricKey,
    /// The value as entered, in the tagged unit
    pub value: f64,
    /// Unit tag as entered (e.g. `"lb"`, `"min"`, `"mi"`)
    pub unit: String,
}

impl RawLogEntry {
    /// Convenience constructor for a log entry.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        metric: MetricKey,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            metric,
            value,
            unit: unit.into(),
        }
    }
}

/// A user's logged metrics normalized to canonical units.
///
/// Missing metrics are represented by absence from the map, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMetricVector {
    /// Timestamp the vector describes (the session or day it was derived from)
    pub timestamp: DateTime<Utc>,
    /// Demographic bucket of the owning user
    pub bucket: DemographicBucket,
    /// Canonical values keyed by metric, in stable key order
    pub metrics: BTreeMap<MetricKey, f64>,
}

impl CanonicalMetricVector {
    /// Create an empty vector for a timestamp and bucket.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, bucket: DemographicBucket) -> Self {
        Self {
            timestamp,
            bucket,
            metrics: BTreeMap::new(),
        }
    }

    /// Canonical value for a metric, if present.
    #[must_use]
    pub fn get(&self, metric: MetricKey) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    /// Whether no metrics are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Biological sex as recorded in the reference datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Parse a dataset cell ("M", "Female", "f", ...) into a sex.
    ///
    /// Returns `None` for unrecognized values; the loader skips those rows.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().chars().next()?.to_ascii_uppercase() {
            'M' => Some(Self::Male),
            'F' => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

/// Self-reported or derived activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no regular exercise
    Sedentary,
    /// 1-2 sessions per week
    Light,
    /// 3-5 sessions per week
    Moderate,
    /// 6+ sessions per week
    High,
}

impl ActivityLevel {
    /// Derive an activity level from a weekly session count.
    #[must_use]
    pub const fn from_weekly_sessions(sessions: u32) -> Self {
        match sessions {
            0 => Self::Sedentary,
            1 | 2 => Self::Light,
            3 | 4 | 5 => Self::Moderate,
            _ => Self::High,
        }
    }

    /// Parse a categorical dataset label ("low", "Moderate", "high", ...).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sedentary" | "none" => Some(Self::Sedentary),
            "light" | "low" => Some(Self::Light),
            "moderate" | "medium" => Some(Self::Moderate),
            "high" | "active" | "very active" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sedentary => f.write_str("sedentary"),
            Self::Light => f.write_str("light"),
            Self::Moderate => f.write_str("moderate"),
            Self::High => f.write_str("high"),
        }
    }
}

/// Age band used for cohort grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRange {
    /// 18-24
    From18To24,
    /// 25-34
    From25To34,
    /// 35-44
    From35To44,
    /// 45-54
    From45To54,
    /// 55-64
    From55To64,
    /// 65 and older
    From65,
}

impl AgeRange {
    /// Band containing the given age. Ages below the first edge fold into
    /// the youngest band so minors logged in the source data still bucket.
    #[must_use]
    pub const fn from_age(age: u32) -> Self {
        if age < AGE_BAND_EDGES[1] {
            Self::From18To24
        } else if age < AGE_BAND_EDGES[2] {
            Self::From25To34
        } else if age < AGE_BAND_EDGES[3] {
            Self::From35To44
        } else if age < AGE_BAND_EDGES[4] {
            Self::From45To54
        } else if age < AGE_BAND_EDGES[5] {
            Self::From55To64
        } else {
            Self::From65
        }
    }

    /// Human-readable band label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55To64 => "55-64",
            Self::From65 => "65+",
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The join key into the reference index: a fully specified demographic cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemographicBucket {
    /// Age band
    pub age: AgeRange,
    /// Biological sex
    pub sex: Sex,
    /// Activity level
    pub activity: ActivityLevel,
}

impl DemographicBucket {
    /// Create a bucket from its three components.
    #[must_use]
    pub const fn new(age: AgeRange, sex: Sex, activity: ActivityLevel) -> Self {
        Self { age, sex, activity }
    }

    /// The ordered ladder of progressively widened cohort keys.
    ///
    /// Comparisons must never fail for lack of an exact demographic match, so
    /// the widening path is explicit data: exact match first, then drop
    /// activity level, then sex, then age, terminating at the full population.
    #[must_use]
    pub const fn fallback_ladder(self) -> [CohortKey; 4] {
        [
            CohortKey {
                age: Some(self.age),
                sex: Some(self.sex),
                activity: Some(self.activity),
            },
            CohortKey {
                age: Some(self.age),
                sex: Some(self.sex),
                activity: None,
            },
            CohortKey {
                age: Some(self.age),
                sex: None,
                activity: None,
            },
            CohortKey::FULL_POPULATION,
        ]
    }
}

impl fmt::Display for DemographicBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.age, self.sex, self.activity)
    }
}

/// A possibly widened cohort key; `None` components match any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    /// Age band, or any age when `None`
    pub age: Option<AgeRange>,
    /// Sex, or any sex when `None`
    pub sex: Option<Sex>,
    /// Activity level, or any level when `None`
    pub activity: Option<ActivityLevel>,
}

impl CohortKey {
    /// The last-resort rung: the entire reference population.
    pub const FULL_POPULATION: Self = Self {
        age: None,
        sex: None,
        activity: None,
    };

    /// Whether this key is the full-population rung.
    #[must_use]
    pub const fn is_full_population(&self) -> bool {
        self.age.is_none() && self.sex.is_none() && self.activity.is_none()
    }
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let age = self.age.map_or("*", AgeRange::label);
        write!(f, "({age}, ")?;
        match self.sex {
            Some(sex) => write!(f, "{sex}, ")?,
            None => f.write_str("*, ")?,
        }
        match self.activity {
            Some(activity) => write!(f, "{activity})"),
            None => f.write_str("*)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_widens_activity_then_sex_then_age() {
        let bucket = DemographicBucket::new(
            AgeRange::From25To34,
            Sex::Male,
            ActivityLevel::Moderate,
        );
        let ladder = bucket.fallback_ladder();
        assert_eq!(ladder[0].activity, Some(ActivityLevel::Moderate));
        assert_eq!(ladder[1].activity, None);
        assert_eq!(ladder[1].sex, Some(Sex::Male));
        assert_eq!(ladder[2].sex, None);
        assert_eq!(ladder[2].age, Some(AgeRange::From25To34));
        assert!(ladder[3].is_full_population());
    }

    #[test]
    fn age_bands_cover_expected_edges() {
        assert_eq!(AgeRange::from_age(24), AgeRange::From18To24);
        assert_eq!(AgeRange::from_age(25), AgeRange::From25To34);
        assert_eq!(AgeRange::from_age(64), AgeRange::From55To64);
        assert_eq!(AgeRange::from_age(80), AgeRange::From65);
    }

    #[test]
    fn sex_parses_dataset_spellings() {
        assert_eq!(Sex::parse("M"), Some(Sex::Male));
        assert_eq!(Sex::parse("female"), Some(Sex::Female));
        assert_eq!(Sex::parse(" f "), Some(Sex::Female));
        assert_eq!(Sex::parse("x"), None);
        assert_eq!(Sex::parse(""), None);
    }

    #[test]
    fn activity_level_from_weekly_sessions() {
        assert_eq!(
            ActivityLevel::from_weekly_sessions(0),
            ActivityLevel::Sedentary
        );
        assert_eq!(ActivityLevel::from_weekly_sessions(2), ActivityLevel::Light);
        assert_eq!(
            ActivityLevel::from_weekly_sessions(4),
            ActivityLevel::Moderate
        );
        assert_eq!(ActivityLevel::from_weekly_sessions(6), ActivityLevel::High);
    }
}
