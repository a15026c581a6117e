//! ID sequencer service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use complihr_shared::types::OrganizationId;
use tracing::{debug, info, warn};

use super::category::{IdCategory, ResetPolicy};
use super::error::SequenceError;
use super::pattern::{IdPattern, RenderContext};
use super::scope::SequenceScope;
use super::store::{OrganizationProfile, SequenceStore};

/// An issued (or previewed) identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedId {
    /// Formatted identifier, e.g. `ACM-EMP-2024-00001`.
    pub value: String,
    /// Counter value embedded in `value`.
    pub sequence: u64,
    /// Counter the value was drawn from.
    pub scope: SequenceScope,
}

/// Pattern in effect for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePattern {
    /// Category.
    pub category: IdCategory,
    /// Parsed pattern.
    pub pattern: IdPattern,
    /// True when no custom pattern is stored.
    pub is_default: bool,
    /// Reset policy derived from the pattern.
    pub reset_policy: ResetPolicy,
}

/// Produces per-organization identifiers from patterns and atomic counters.
///
/// Every call re-reads the pattern and increments the counter in storage;
/// nothing is cached in process.
#[derive(Clone)]
pub struct IdSequencer {
    store: Arc<dyn SequenceStore>,
    default_timezone: Tz,
}

impl IdSequencer {
    /// Creates a sequencer over `store`, resolving dates in `Europe/London`
    /// when an organization's timezone is unusable.
    #[must_use]
    pub fn new(store: Arc<dyn SequenceStore>) -> Self {
        Self {
            store,
            default_timezone: chrono_tz::Europe::London,
        }
    }

    /// Overrides the fallback timezone.
    #[must_use]
    pub fn with_default_timezone(mut self, timezone: Tz) -> Self {
        self.default_timezone = timezone;
        self
    }

    /// Validates a pattern without storing it. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidPattern` if the pattern is malformed.
    pub fn validate_pattern(pattern: &str) -> Result<IdPattern, SequenceError> {
        Ok(IdPattern::parse(pattern.trim())?)
    }

    /// Issues the next identifier for `category`.
    ///
    /// `as_of` drives the date placeholders and the counter scope; it
    /// defaults to today in the organization's timezone. The counter is
    /// incremented exactly once per successful call, and values consumed by
    /// callers that later abort are not reissued.
    ///
    /// # Errors
    ///
    /// - `OrganizationNotFound` if the organization does not exist
    /// - `OrganizationInactive` if it is deactivated
    /// - `InvalidPattern` if the stored pattern is malformed
    /// - `StorageUnavailable` if the store fails
    pub async fn generate_id(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        as_of: Option<NaiveDate>,
    ) -> Result<GeneratedId, SequenceError> {
        let profile = self.load_profile(organization_id).await?;
        if !profile.is_active {
            return Err(SequenceError::OrganizationInactive(organization_id));
        }

        // The pattern must parse before the counter moves.
        let pattern = effective_pattern(&profile, category)?;
        let date = as_of.unwrap_or_else(|| self.today_for(&profile));
        let scope =
            SequenceScope::for_date(organization_id, category, pattern.reset_policy(category), date);

        let sequence = self.store.next_value(&scope).await?;
        let value = pattern.render(&RenderContext {
            organization_code: &profile.code,
            date,
            sequence,
        });

        debug!(
            organization_id = %organization_id,
            category = %category,
            sequence,
            id = %value,
            "Issued identifier"
        );

        Ok(GeneratedId {
            value,
            sequence,
            scope,
        })
    }

    /// Renders the identifier the next `generate_id` call would return if no
    /// other caller issues one first. Never increments the counter.
    ///
    /// # Errors
    ///
    /// Same as `generate_id`, except inactive organizations can be previewed.
    pub async fn preview_id(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        as_of: Option<NaiveDate>,
    ) -> Result<GeneratedId, SequenceError> {
        let profile = self.load_profile(organization_id).await?;
        let pattern = effective_pattern(&profile, category)?;
        let date = as_of.unwrap_or_else(|| self.today_for(&profile));
        let scope =
            SequenceScope::for_date(organization_id, category, pattern.reset_policy(category), date);

        let sequence = self.store.current_value(&scope).await?.saturating_add(1);
        let value = pattern.render(&RenderContext {
            organization_code: &profile.code,
            date,
            sequence,
        });

        Ok(GeneratedId {
            value,
            sequence,
            scope,
        })
    }

    /// Replaces the organization's pattern for `category`.
    ///
    /// Counters are untouched: the next ID continues from the last value,
    /// formatted with the new pattern.
    ///
    /// # Errors
    ///
    /// - `InvalidPattern` if the pattern is malformed or too long
    /// - `OrganizationNotFound` if the organization does not exist
    /// - `StorageUnavailable` if the store fails
    pub async fn update_pattern(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        pattern: &str,
    ) -> Result<IdPattern, SequenceError> {
        let pattern = Self::validate_pattern(pattern)?;

        if !self
            .store
            .save_pattern(organization_id, category, Some(pattern.as_str()))
            .await?
        {
            return Err(SequenceError::OrganizationNotFound(organization_id));
        }

        info!(
            organization_id = %organization_id,
            category = %category,
            pattern = %pattern,
            "ID pattern updated"
        );

        Ok(pattern)
    }

    /// Clears the custom pattern so the built-in default applies again.
    ///
    /// # Errors
    ///
    /// - `OrganizationNotFound` if the organization does not exist
    /// - `StorageUnavailable` if the store fails
    pub async fn reset_pattern(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
    ) -> Result<IdPattern, SequenceError> {
        if !self
            .store
            .save_pattern(organization_id, category, None)
            .await?
        {
            return Err(SequenceError::OrganizationNotFound(organization_id));
        }

        info!(
            organization_id = %organization_id,
            category = %category,
            "ID pattern reset to default"
        );

        Ok(IdPattern::default_for(category)?)
    }

    /// Lists the pattern in effect for every category.
    ///
    /// # Errors
    ///
    /// - `OrganizationNotFound` if the organization does not exist
    /// - `InvalidPattern` if a stored pattern is malformed
    /// - `StorageUnavailable` if the store fails
    pub async fn list_patterns(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<EffectivePattern>, SequenceError> {
        let profile = self.load_profile(organization_id).await?;

        IdCategory::ALL
            .into_iter()
            .map(|category| {
                let pattern = effective_pattern(&profile, category)?;
                Ok(EffectivePattern {
                    category,
                    reset_policy: pattern.reset_policy(category),
                    is_default: profile.custom_pattern(category).is_none(),
                    pattern,
                })
            })
            .collect()
    }

    async fn load_profile(
        &self,
        organization_id: OrganizationId,
    ) -> Result<OrganizationProfile, SequenceError> {
        self.store
            .load_profile(organization_id)
            .await?
            .ok_or(SequenceError::OrganizationNotFound(organization_id))
    }

    fn today_for(&self, profile: &OrganizationProfile) -> NaiveDate {
        let timezone = profile.timezone.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                organization_id = %profile.organization_id,
                timezone = %profile.timezone,
                fallback = %self.default_timezone,
                "Unknown organization timezone"
            );
            self.default_timezone
        });

        Utc::now().with_timezone(&timezone).date_naive()
    }
}

fn effective_pattern(
    profile: &OrganizationProfile,
    category: IdCategory,
) -> Result<IdPattern, SequenceError> {
    let pattern = match profile.custom_pattern(category) {
        Some(custom) => IdPattern::parse(custom)?,
        None => IdPattern::default_for(category)?,
    };
    Ok(pattern)
}
