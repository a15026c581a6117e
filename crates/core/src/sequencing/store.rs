//! Storage seam for organization patterns and sequence counters.

use std::collections::HashMap;

use async_trait::async_trait;
use complihr_shared::types::OrganizationId;

use super::category::IdCategory;
use super::error::SequenceError;
use super::scope::SequenceScope;

/// The parts of an organization and its settings that sequencing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationProfile {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Short code substituted for `{ORG}`.
    pub code: String,
    /// IANA timezone used to resolve "today".
    pub timezone: String,
    /// Inactive organizations cannot issue new IDs.
    pub is_active: bool,
    /// Custom patterns; categories absent here use the built-in default.
    pub patterns: HashMap<IdCategory, String>,
}

impl OrganizationProfile {
    /// Creates an active profile with no custom patterns.
    #[must_use]
    pub fn new(organization_id: OrganizationId, code: &str, timezone: &str) -> Self {
        Self {
            organization_id,
            code: code.to_string(),
            timezone: timezone.to_string(),
            is_active: true,
            patterns: HashMap::new(),
        }
    }

    /// Stored custom pattern for `category`, if any.
    #[must_use]
    pub fn custom_pattern(&self, category: IdCategory) -> Option<&str> {
        self.patterns.get(&category).map(String::as_str)
    }
}

/// Durable storage for patterns and counters.
///
/// `next_value` must be a single indivisible read-modify-write: concurrent
/// callers on the same scope never receive the same value, across processes
/// as well as tasks.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Loads the organization's code, timezone, status and custom patterns.
    ///
    /// Returns `Ok(None)` if the organization does not exist.
    async fn load_profile(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Option<OrganizationProfile>, SequenceError>;

    /// Stores (`Some`) or clears (`None`) the custom pattern for a category.
    ///
    /// Returns `Ok(false)` if the organization does not exist.
    async fn save_pattern(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        pattern: Option<&str>,
    ) -> Result<bool, SequenceError>;

    /// Atomically increments the scope's counter and returns the new value.
    ///
    /// A missing counter is created. Lifetime scopes start from the
    /// organization's legacy counter for the category, others from zero.
    async fn next_value(&self, scope: &SequenceScope) -> Result<u64, SequenceError>;

    /// Last value issued in the scope without incrementing it.
    async fn current_value(&self, scope: &SequenceScope) -> Result<u64, SequenceError>;
}
