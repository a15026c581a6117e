//! In-memory sequence store.
//!
//! Counters live in a `DashMap`; the entry guard holds the shard lock for the
//! whole increment, so concurrent tasks on one scope are serialized. State is
//! per-process, so this store suits tests and local tooling, not multi-instance
//! deployments.

use async_trait::async_trait;
use complihr_shared::types::OrganizationId;
use dashmap::DashMap;

use super::category::IdCategory;
use super::error::SequenceError;
use super::scope::SequenceScope;
use super::store::{OrganizationProfile, SequenceStore};

/// Process-local `SequenceStore`.
#[derive(Debug, Default)]
pub struct InMemorySequenceStore {
    profiles: DashMap<OrganizationId, OrganizationProfile>,
    legacy_counters: DashMap<(OrganizationId, IdCategory), u64>,
    counters: DashMap<SequenceScope, u64>,
}

impl InMemorySequenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an organization.
    pub fn insert_organization(&self, profile: OrganizationProfile) {
        self.profiles.insert(profile.organization_id, profile);
    }

    /// Activates or deactivates an organization. Returns false if unknown.
    pub fn set_active(&self, organization_id: OrganizationId, is_active: bool) -> bool {
        self.profiles
            .get_mut(&organization_id)
            .map(|mut profile| profile.is_active = is_active)
            .is_some()
    }

    /// Sets the legacy counter that seeds the category's lifetime scope.
    pub fn set_legacy_counter(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        value: u64,
    ) {
        self.legacy_counters
            .insert((organization_id, category), value);
    }

    fn seed(&self, scope: &SequenceScope) -> u64 {
        if !scope.is_lifetime() {
            return 0;
        }
        self.legacy_counters
            .get(&(scope.organization_id, scope.category))
            .map_or(0, |value| *value)
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn load_profile(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Option<OrganizationProfile>, SequenceError> {
        Ok(self
            .profiles
            .get(&organization_id)
            .map(|profile| profile.clone()))
    }

    async fn save_pattern(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        pattern: Option<&str>,
    ) -> Result<bool, SequenceError> {
        let Some(mut profile) = self.profiles.get_mut(&organization_id) else {
            return Ok(false);
        };

        match pattern {
            Some(pattern) => {
                profile.patterns.insert(category, pattern.to_string());
            }
            None => {
                profile.patterns.remove(&category);
            }
        }

        Ok(true)
    }

    async fn next_value(&self, scope: &SequenceScope) -> Result<u64, SequenceError> {
        let seed = self.seed(scope);
        let mut counter = self.counters.entry(*scope).or_insert(seed);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| SequenceError::StorageUnavailable("sequence counter overflow".into()))?;
        Ok(*counter)
    }

    async fn current_value(&self, scope: &SequenceScope) -> Result<u64, SequenceError> {
        Ok(self
            .counters
            .get(scope)
            .map_or_else(|| self.seed(scope), |value| *value))
    }
}
