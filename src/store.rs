// ABOUTME: Record store boundary supplying raw log entries and user profiles to the engine
// ABOUTME: Async trait plus a concurrent in-memory implementation for tests and demos
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitFuture

//! The external record store boundary.
//!
//! Workout persistence and user profiles are external collaborators; the
//! engine only needs a way to fetch a user's raw entries and enough profile
//! data to assign a demographic bucket. [`InMemoryStore`] backs the tests
//! and the demo CLI.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fitfuture_core::errors::EngineResult;
use fitfuture_core::models::{ActivityLevel, AgeRange, DemographicBucket, RawLogEntry, Sex};

/// Profile data the engine needs to assign a demographic bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in years
    pub age: u32,
    /// Biological sex
    pub sex: Sex,
    /// Self-reported activity level
    pub activity: ActivityLevel,
}

impl UserProfile {
    /// The demographic bucket this profile falls into.
    #[must_use]
    pub const fn bucket(&self) -> DemographicBucket {
        DemographicBucket::new(AgeRange::from_age(self.age), self.sex, self.activity)
    }
}

/// Read access to a user's logged entries and profile.
#[async_trait]
pub trait LogEntryStore: Send + Sync {
    /// All raw log entries for a user, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`fitfuture_core::errors::EngineError::Storage`] when the
    /// backing store fails.
    async fn entries_for_user(&self, user_id: Uuid) -> EngineResult<Vec<RawLogEntry>>;

    /// The user's profile, or `None` when no profile exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`fitfuture_core::errors::EngineError::Storage`] when the
    /// backing store fails.
    async fn profile_for_user(&self, user_id: Uuid) -> EngineResult<Option<UserProfile>>;
}

/// Concurrent in-memory store for tests and the demo CLI.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<Uuid, Vec<RawLogEntry>>,
    profiles: DashMap<Uuid, UserProfile>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a user's profile.
    pub fn set_profile(&self, user_id: Uuid, profile: UserProfile) {
        self.profiles.insert(user_id, profile);
    }

    /// Append entries to a user's log.
    pub fn append_entries(&self, user_id: Uuid, new_entries: impl IntoIterator<Item = RawLogEntry>) {
        self.entries.entry(user_id).or_default().extend(new_entries);
    }
}

#[async_trait]
impl LogEntryStore for InMemoryStore {
    async fn entries_for_user(&self, user_id: Uuid) -> EngineResult<Vec<RawLogEntry>> {
        Ok(self
            .entries
            .get(&user_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn profile_for_user(&self, user_id: Uuid) -> EngineResult<Option<UserProfile>> {
        Ok(self.profiles.get(&user_id).map(|profile| *profile))
    }
}
