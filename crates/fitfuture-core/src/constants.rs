// ABOUTME: Engine defaults and physiological plausibility bounds
// ABOUTME: Named constants consumed by the normalizer, comparator, and projector
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Engine defaults and physiological plausibility bounds.

/// Entries older than this many days are excluded from the "current"
/// canonical vector (they still feed the historical series).
pub const DEFAULT_STALENESS_DAYS: i64 = 30;

/// Minimum history points per metric before a trend is fitted.
pub const DEFAULT_MIN_HISTORY_POINTS: usize = 3;

/// Default spacing between projected points, in days.
pub const DEFAULT_PROJECTION_STEP_DAYS: i64 = 7;

/// Horizons shorter than this many days project on a daily grid instead.
pub const SHORT_HORIZON_DAYS: i64 = 14;

/// Plausibility bounds used to clamp projected values.
pub mod plausible {
    /// Workout duration per session, minutes.
    pub const DURATION_MIN: (f64, f64) = (0.0, 1_440.0);
    /// Energy expenditure per session, kilocalories.
    pub const CALORIES: (f64, f64) = (0.0, 20_000.0);
    /// Heart rate, beats per minute.
    pub const HEART_RATE_BPM: (f64, f64) = (0.0, 300.0);
    /// Body weight, kilograms.
    pub const WEIGHT_KG: (f64, f64) = (0.0, 500.0);
    /// Daily step count.
    pub const STEPS: (f64, f64) = (0.0, 200_000.0);
    /// Sleep per night, hours.
    pub const SLEEP_HOURS: (f64, f64) = (0.0, 24.0);
    /// Distance per session, kilometers.
    pub const DISTANCE_KM: (f64, f64) = (0.0, 1_000.0);
}

/// Age band boundaries for demographic bucketing (inclusive lower edges).
pub const AGE_BAND_EDGES: [u32; 6] = [18, 25, 35, 45, 55, 65];
