// ABOUTME: Demo CLI seeding sample log entries and printing a comparison and projection
// ABOUTME: Loads the three reference datasets and walks a hypothetical user through the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! FitFuture demo CLI.
//!
//! Seeds a hypothetical user with a few weeks of workout history, loads the
//! reference datasets, and prints their population comparison and a simple
//! forward projection.
//!
//! Usage:
//! ```bash
//! # Compare and project against datasets under ./data
//! cargo run --bin fitfuture-cli
//!
//! # Custom demographics and horizon
//! cargo run --bin fitfuture-cli -- --age 31 --sex f --activity high --horizon-days 56
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use fitfuture::config::{standard_sources, EngineConfig};
use fitfuture::engine::AnalyticsEngine;
use fitfuture::logging::{self, LoggingConfig};
use fitfuture::models::{ActivityLevel, MetricKey, RawLogEntry, Sex};
use fitfuture::store::{InMemoryStore, UserProfile};

#[derive(Parser)]
#[command(
    name = "fitfuture-cli",
    about = "FitFuture engine demo",
    long_about = "Seed demo workout history and print a population comparison and projection"
)]
struct CliArgs {
    /// Directory containing the three reference dataset CSV files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Demo user's age
    #[arg(long, default_value = "25")]
    age: u32,

    /// Demo user's sex (m/f)
    #[arg(long, default_value = "m")]
    sex: String,

    /// Demo user's activity level (sedentary/light/moderate/high)
    #[arg(long, default_value = "moderate")]
    activity: String,

    /// Projection horizon in days
    #[arg(long, default_value = "28")]
    horizon_days: i64,

    /// Weeks of demo history to seed
    #[arg(long, default_value = "8")]
    weeks: u32,

    /// RNG seed for reproducible demo data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Emit the comparison and projection as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// Seed a gently improving training history: session durations drift up,
/// weight drifts down, with mild per-week noise.
fn seed_entries(rng: &mut StdRng, weeks: u32) -> Vec<RawLogEntry> {
    let now = Utc::now();
    let mut entries = Vec::new();

    for week in 0..weeks {
        let weeks_ago = i64::from(weeks - week);
        let day = now - Duration::weeks(weeks_ago);

        let duration = 40.0 + f64::from(week) * 1.5 + rng.gen_range(-5.0..5.0);
        entries.push(RawLogEntry::new(day, MetricKey::DurationMin, duration, "min"));

        let calories = duration * rng.gen_range(7.0..9.0);
        entries.push(RawLogEntry::new(day, MetricKey::Calories, calories, "kcal"));

        // Logged the way an American gym-goer would: in pounds.
        let weight_lb = 165.0 - f64::from(week) * 0.8 + rng.gen_range(-0.5..0.5);
        entries.push(RawLogEntry::new(day, MetricKey::WeightKg, weight_lb, "lb"));

        let steps = rng.gen_range(6_000.0..11_000.0);
        entries.push(RawLogEntry::new(day, MetricKey::Steps, steps, "steps"));
    }

    entries
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init(&LoggingConfig::from_env())?;

    let Some(sex) = Sex::parse(&args.sex) else {
        bail!("unrecognized sex '{}', expected m or f", args.sex);
    };
    let Some(activity) = ActivityLevel::parse(&args.activity) else {
        bail!("unrecognized activity level '{}'", args.activity);
    };

    let user_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::new());
    store.set_profile(
        user_id,
        UserProfile {
            age: args.age,
            sex,
            activity,
        },
    );
    let mut rng = StdRng::seed_from_u64(args.seed);
    store.append_entries(user_id, seed_entries(&mut rng, args.weeks));

    let config = EngineConfig::with_datasets(standard_sources(&args.data_dir));
    let engine = AnalyticsEngine::new(store, config)
        .await
        .context("failed to load reference datasets")?;

    let outcome = engine.compare(user_id, Utc::now()).await?;
    let projection = engine.project(user_id, Duration::days(args.horizon_days)).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "comparison": outcome.comparison,
                "projection": projection,
            }))?
        );
        return Ok(());
    }

    println!("=== Population comparison ({}) ===", outcome.comparison.bucket);
    for metric in &outcome.comparison.metrics {
        let delta = metric
            .relative_delta
            .map_or("undefined".to_owned(), |delta| format!("{:+.1}%", delta * 100.0));
        println!(
            "  {:<16} {:>10.1}  p{:<4.0} vs median {:.1} ({delta}, cohort {} of {} samples)",
            metric.metric.as_str(),
            metric.user_value,
            metric.percentile_rank * 100.0,
            metric.cohort_median,
            metric.matched_cohort,
            metric.cohort_size,
        );
    }
    for metric in &outcome.comparison.uncovered {
        println!("  {:<16} no reference coverage", metric.as_str());
    }
    for rejected in &outcome.rejected {
        println!("  rejected entry: {}", rejected.error);
    }

    println!("\n=== {}-day projection ===", projection.horizon_days);
    for metric in &projection.metrics {
        let Some(endpoint) = metric.points.last() else {
            continue;
        };
        println!(
            "  {:<16} {:>10.1} .. [{:.1}, {:.1}]  (slope {:+.3}/day over {} points{})",
            metric.metric.as_str(),
            endpoint.value,
            endpoint.lower,
            endpoint.upper,
            metric.fit.slope_per_day,
            metric.fit.sample_count,
            if endpoint.clamped { ", clamped" } else { "" },
        );
    }
    for skipped in &projection.skipped {
        println!(
            "  {:<16} skipped: {} of {} required history points",
            skipped.metric.as_str(),
            skipped.points,
            skipped.required,
        );
    }

    Ok(())
}
