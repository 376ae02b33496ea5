// ABOUTME: AnalyticsEngine facade exposing compare, project, and reference reload
// ABOUTME: Holds the shared reference index behind an atomically swapped Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! The engine facade.
//!
//! The reference index is built once at startup and shared read-only across
//! concurrent requests; comparisons and projections are independent pure
//! computations over their inputs. `reload_reference_data` builds a
//! replacement index fully off to the side and atomically swaps the shared
//! pointer, so in-flight reads never observe a partially loaded index and a
//! failed reload leaves the previous index in service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tokio::task;
use tracing::{info, instrument};
use uuid::Uuid;

use fitfuture_core::errors::{EngineError, EngineResult};
use fitfuture_core::models::DemographicBucket;
use fitfuture_insight::comparator::{self, ComparisonResult};
use fitfuture_insight::normalizer::{Normalizer, RejectedEntry};
use fitfuture_insight::projector::{ProjectionResult, Projector};
use fitfuture_insight::reference::{DatasetSource, ReferenceIndex};

use crate::config::EngineConfig;
use crate::store::LogEntryStore;

/// A comparison plus the per-entry rejections normalization produced.
#[derive(Debug)]
pub struct CompareOutcome {
    /// The population comparison
    pub comparison: ComparisonResult,
    /// Entries rejected for unknown unit tags (reported, not fatal)
    pub rejected: Vec<RejectedEntry>,
}

/// The population comparison and projection engine.
pub struct AnalyticsEngine {
    store: Arc<dyn LogEntryStore>,
    datasets: Vec<DatasetSource>,
    normalizer: Normalizer,
    projector: Projector,
    index: RwLock<Arc<ReferenceIndex>>,
}

impl AnalyticsEngine {
    /// Build the engine, loading and indexing the reference datasets.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DataLoad`] when any dataset source is
    /// unreadable or missing required columns. This is fatal at startup: the
    /// engine must not serve comparisons without reference data.
    pub async fn new(store: Arc<dyn LogEntryStore>, config: EngineConfig) -> EngineResult<Self> {
        let index = build_index(config.datasets.clone()).await?;
        Ok(Self {
            store,
            datasets: config.datasets,
            normalizer: Normalizer::new(config.staleness_days),
            projector: Projector::new(config.min_history_points, config.projection_step_days),
            index: RwLock::new(Arc::new(index)),
        })
    }

    /// Compare a user's current canonical vector against their cohort.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingProfile`] when no profile exists for
    /// the user, or a storage error from the record store. Unknown-unit
    /// entries and uncovered metrics degrade the result, never fail it.
    #[instrument(skip(self))]
    pub async fn compare(
        &self,
        user_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> EngineResult<CompareOutcome> {
        let bucket = self.bucket_for(user_id).await?;
        let entries = self.store.entries_for_user(user_id).await?;
        let outcome = self.normalizer.normalize(&entries, bucket, as_of);

        let index = self.index_snapshot().await;
        let comparison = comparator::compare(&outcome.vector, bucket, &index);

        Ok(CompareOutcome {
            comparison,
            rejected: outcome.rejected,
        })
    }

    /// Project the user's metrics forward over the horizon.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingProfile`] when no profile exists for
    /// the user, or a storage error from the record store. Metrics with too
    /// little history are omitted from the result, never an error.
    #[instrument(skip(self))]
    pub async fn project(
        &self,
        user_id: Uuid,
        horizon: Duration,
    ) -> EngineResult<ProjectionResult> {
        let bucket = self.bucket_for(user_id).await?;
        let entries = self.store.entries_for_user(user_id).await?;
        let history = self.normalizer.normalize_history(&entries, bucket);
        Ok(self.projector.project(&history.vectors, horizon))
    }

    /// Re-ingest the reference datasets without restarting the process.
    ///
    /// The replacement index is built completely before the shared pointer
    /// swaps; on failure the previously loaded index remains in service.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DataLoad`] when any source fails to load, or
    /// [`EngineError::ReloadTask`] if the load task itself dies.
    pub async fn reload_reference_data(&self) -> EngineResult<()> {
        let rebuilt = build_index(self.datasets.clone()).await?;
        let mut guard = self.index.write().await;
        *guard = Arc::new(rebuilt);
        info!(cohorts = guard.cohort_count(), "reference index reloaded");
        Ok(())
    }

    /// Snapshot of the currently served reference index.
    pub async fn index_snapshot(&self) -> Arc<ReferenceIndex> {
        Arc::clone(&*self.index.read().await)
    }

    async fn bucket_for(&self, user_id: Uuid) -> EngineResult<DemographicBucket> {
        self.store
            .profile_for_user(user_id)
            .await?
            .map(|profile| profile.bucket())
            .ok_or(EngineError::MissingProfile { user_id })
    }
}

/// Dataset loading is the engine's only I/O-bound step; it runs off the
/// async workers.
async fn build_index(sources: Vec<DatasetSource>) -> EngineResult<ReferenceIndex> {
    task::spawn_blocking(move || ReferenceIndex::load(&sources))
        .await
        .map_err(|err| EngineError::ReloadTask(err.to_string()))?
}
