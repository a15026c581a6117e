//! Counter scope derivation.

use chrono::{Datelike, NaiveDate};
use complihr_shared::types::OrganizationId;

use super::category::{IdCategory, ResetPolicy};

/// Identifies one independent counter: (organization, category, year?, month?).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceScope {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// ID category.
    pub category: IdCategory,
    /// Calendar year, for yearly and monthly counters.
    pub year: Option<i32>,
    /// Calendar month (1-12), for monthly counters.
    pub month: Option<u32>,
}

impl SequenceScope {
    /// Derives the scope for `date` under `policy`.
    #[must_use]
    pub fn for_date(
        organization_id: OrganizationId,
        category: IdCategory,
        policy: ResetPolicy,
        date: NaiveDate,
    ) -> Self {
        let (year, month) = match policy {
            ResetPolicy::Never => (None, None),
            ResetPolicy::Yearly => (Some(date.year()), None),
            ResetPolicy::Monthly => (Some(date.year()), Some(date.month())),
        };

        Self {
            organization_id,
            category,
            year,
            month,
        }
    }

    /// True for counters that never reset.
    #[must_use]
    pub const fn is_lifetime(&self) -> bool {
        self.year.is_none() && self.month.is_none()
    }

    /// Year as stored in `id_sequences.year` (0 = not year-scoped).
    #[must_use]
    pub fn storage_year(&self) -> i32 {
        self.year.unwrap_or(0)
    }

    /// Month as stored in `id_sequences.month` (0 = not month-scoped).
    #[must_use]
    pub fn storage_month(&self) -> i16 {
        self.month
            .and_then(|m| i16::try_from(m).ok())
            .unwrap_or(0)
    }
}
