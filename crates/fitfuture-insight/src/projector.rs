// ABOUTME: Trend projector fitting OLS per metric and extrapolating over a horizon
// ABOUTME: Heuristic confidence bands and plausibility clamping, short histories omitted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! Trend projection.
//!
//! Per metric, an ordinary-least-squares line is fitted over
//! (elapsed days, value) pairs from the user's own history and extrapolated
//! across the requested horizon. The confidence band is a deliberately
//! simple, explainable heuristic: proportional to the residual standard
//! deviation, scaled down by the square root of the sample count and widening
//! with distance beyond the observed span. It claims no statistical accuracy.
//!
//! Metrics with fewer than the minimum number of history points are listed
//! as skipped rather than projected from noise.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use fitfuture_core::constants::{
    DEFAULT_MIN_HISTORY_POINTS, DEFAULT_PROJECTION_STEP_DAYS, SHORT_HORIZON_DAYS,
};
use fitfuture_core::models::{CanonicalMetricVector, MetricKey};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fitted parameters of the per-metric linear trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFit {
    /// Fitted slope, canonical units per day
    pub slope_per_day: f64,
    /// Fitted intercept at the first sample's timestamp
    pub intercept: f64,
    /// Residual standard deviation of the fit
    pub residual_std: f64,
    /// Number of history points the fit used
    pub sample_count: usize,
}

/// One projected point with its confidence band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedPoint {
    /// Future timestamp the value is projected for
    pub timestamp: DateTime<Utc>,
    /// Projected value, clamped to the metric's plausible range
    pub value: f64,
    /// Lower edge of the confidence band (clamped)
    pub lower: f64,
    /// Upper edge of the confidence band (clamped)
    pub upper: f64,
    /// Whether plausibility clamping changed the projected value
    pub clamped: bool,
}

/// Projection for one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricProjection {
    /// Metric being projected
    pub metric: MetricKey,
    /// The fitted trend parameters
    pub fit: TrendFit,
    /// Projected points, ascending by timestamp
    pub points: Vec<ProjectedPoint>,
}

/// A metric omitted from the projection for lack of history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedMetric {
    /// Metric that was skipped
    pub metric: MetricKey,
    /// History points available
    pub points: usize,
    /// History points required
    pub required: usize,
}

/// One projection request's result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Requested horizon in days
    pub horizon_days: i64,
    /// Per-metric projections
    pub metrics: Vec<MetricProjection>,
    /// Metrics with some history but too little to fit a trend
    pub skipped: Vec<SkippedMetric>,
}

/// Fits and extrapolates per-metric trends from a user's history.
#[derive(Debug, Clone)]
pub struct Projector {
    min_history_points: usize,
    step_days: i64,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HISTORY_POINTS, DEFAULT_PROJECTION_STEP_DAYS)
    }
}

/// Per-metric time series extracted from the history.
struct Series {
    base: DateTime<Utc>,
    last: DateTime<Utc>,
    /// (elapsed days since base, value), ascending
    samples: Vec<(f64, f64)>,
}

impl Series {
    fn extract(history: &[CanonicalMetricVector], metric: MetricKey) -> Option<Self> {
        let mut points: Vec<(DateTime<Utc>, f64)> = history
            .iter()
            .filter_map(|vector| vector.get(metric).map(|value| (vector.timestamp, value)))
            .collect();
        if points.is_empty() {
            return None;
        }
        points.sort_by_key(|(timestamp, _)| *timestamp);
        let base = points[0].0;
        let last = points[points.len() - 1].0;
        let samples = points
            .into_iter()
            .map(|(timestamp, value)| (elapsed_days(base, timestamp), value))
            .collect();
        Some(Self {
            base,
            last,
            samples,
        })
    }

    fn span_days(&self) -> f64 {
        self.samples.last().map_or(0.0, |(days, _)| *days)
    }
}

fn elapsed_days(base: DateTime<Utc>, timestamp: DateTime<Utc>) -> f64 {
    (timestamp - base).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Ordinary least squares over the series. `None` when all samples share one
/// timestamp (slope undefined).
fn fit_ols(samples: &[(f64, f64)]) -> Option<TrendFit> {
    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx = samples
        .iter()
        .map(|(x, _)| (x - mean_x).powi(2))
        .sum::<f64>();
    if sxx == 0.0 {
        return None;
    }
    let sxy = samples
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>();

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);

    let sse = samples
        .iter()
        .map(|(x, y)| {
            let predicted = slope.mul_add(*x, intercept);
            (y - predicted).powi(2)
        })
        .sum::<f64>();
    let degrees_of_freedom = (samples.len().saturating_sub(2)).max(1) as f64;

    Some(TrendFit {
        slope_per_day: slope,
        intercept,
        residual_std: (sse / degrees_of_freedom).sqrt(),
        sample_count: samples.len(),
    })
}

impl Projector {
    /// Create a projector with explicit thresholds.
    #[must_use]
    pub const fn new(min_history_points: usize, step_days: i64) -> Self {
        Self {
            min_history_points,
            step_days: if step_days < 1 { 1 } else { step_days },
        }
    }

    /// Offsets (in days from the last observation) to project at: a regular
    /// grid plus the exact horizon endpoint. Short horizons use a daily grid.
    fn offsets(&self, horizon_days: i64) -> Vec<i64> {
        let step = if horizon_days < SHORT_HORIZON_DAYS {
            1
        } else {
            self.step_days
        };
        let mut offsets: Vec<i64> = (1..=horizon_days / step).map(|i| i * step).collect();
        if offsets.last() != Some(&horizon_days) {
            offsets.push(horizon_days);
        }
        offsets
    }

    /// Project every metric with sufficient history across the horizon.
    ///
    /// The history must be ascending by timestamp; per-metric series are
    /// re-sorted defensively since gaps differ between metrics. Metrics with
    /// fewer than the configured minimum of points are listed in
    /// [`ProjectionResult::skipped`]; metrics entirely absent from the
    /// history are omitted.
    #[must_use]
    pub fn project(
        &self,
        history: &[CanonicalMetricVector],
        horizon: Duration,
    ) -> ProjectionResult {
        let horizon_days = horizon.num_days().max(1);
        let offsets = self.offsets(horizon_days);

        let mut metrics = Vec::new();
        let mut skipped = Vec::new();

        for metric in MetricKey::ALL {
            let Some(series) = Series::extract(history, metric) else {
                continue;
            };
            let fit = if series.samples.len() < self.min_history_points {
                None
            } else {
                fit_ols(&series.samples)
            };
            let Some(fit) = fit else {
                debug!(
                    %metric,
                    points = series.samples.len(),
                    required = self.min_history_points,
                    "omitting metric from projection, insufficient history"
                );
                skipped.push(SkippedMetric {
                    metric,
                    points: series.samples.len(),
                    required: self.min_history_points,
                });
                continue;
            };

            let points = Self::extrapolate(metric, &series, &fit, &offsets);
            metrics.push(MetricProjection {
                metric,
                fit,
                points,
            });
        }

        ProjectionResult {
            horizon_days,
            metrics,
            skipped,
        }
    }

    fn extrapolate(
        metric: MetricKey,
        series: &Series,
        fit: &TrendFit,
        offsets: &[i64],
    ) -> Vec<ProjectedPoint> {
        let (range_min, range_max) = metric.plausible_range();
        let span = series.span_days().max(1.0);
        let last_x = series.span_days();
        let n_sqrt = (fit.sample_count as f64).sqrt();
        let last_observed = series.last;

        offsets
            .iter()
            .map(|offset| {
                let timestamp = last_observed + Duration::days(*offset);
                let x = elapsed_days(series.base, timestamp);
                let raw = fit.slope_per_day.mul_add(x, fit.intercept);
                let half_width = fit.residual_std * (1.0 + (x - last_x) / span) / n_sqrt;

                let value = raw.clamp(range_min, range_max);
                ProjectedPoint {
                    timestamp,
                    value,
                    lower: (raw - half_width).clamp(range_min, range_max),
                    upper: (raw + half_width).clamp(range_min, range_max),
                    clamped: (value - raw).abs() > f64::EPSILON,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fitfuture_core::models::{ActivityLevel, AgeRange, DemographicBucket, Sex};

    fn weight_history(values: &[f64]) -> Vec<CanonicalMetricVector> {
        let bucket =
            DemographicBucket::new(AgeRange::From25To34, Sex::Female, ActivityLevel::Light);
        values
            .iter()
            .enumerate()
            .map(|(week, value)| {
                let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
                    + Duration::weeks(week as i64);
                let mut vector = CanonicalMetricVector::new(timestamp, bucket);
                vector.metrics.insert(MetricKey::WeightKg, *value);
                vector
            })
            .collect()
    }

    #[test]
    fn ols_recovers_exact_linear_trend() {
        let samples = [(0.0, 80.0), (7.0, 79.5), (14.0, 79.0)];
        let fit = fit_ols(&samples).unwrap();
        assert!((fit.slope_per_day - (-0.5 / 7.0)).abs() < 1e-9);
        assert!((fit.intercept - 80.0).abs() < 1e-9);
        assert!(fit.residual_std.abs() < 1e-9);
    }

    #[test]
    fn short_history_is_skipped_not_projected() {
        let history = weight_history(&[80.0, 79.5]);
        let result = Projector::default().project(&history, Duration::weeks(4));
        assert!(result.metrics.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].metric, MetricKey::WeightKg);
        assert_eq!(result.skipped[0].points, 2);
    }

    #[test]
    fn single_day_history_has_no_defined_slope() {
        let bucket =
            DemographicBucket::new(AgeRange::From25To34, Sex::Female, ActivityLevel::Light);
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let history: Vec<_> = (0..3)
            .map(|_| {
                let mut vector = CanonicalMetricVector::new(timestamp, bucket);
                vector.metrics.insert(MetricKey::WeightKg, 80.0);
                vector
            })
            .collect();
        let result = Projector::default().project(&history, Duration::weeks(2));
        assert!(result.metrics.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn projection_endpoint_lands_on_horizon() {
        let history = weight_history(&[80.0, 79.5, 79.0, 78.5, 78.0]);
        let result = Projector::default().project(&history, Duration::days(30));
        let projection = &result.metrics[0];
        let last = projection.points.last().unwrap();
        let first_observed = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let last_observed = first_observed + Duration::weeks(4);
        assert_eq!(last.timestamp, last_observed + Duration::days(30));
    }
}
