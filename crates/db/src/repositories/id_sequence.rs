//! PostgreSQL-backed `SequenceStore`.
//!
//! Increments go through the `next_id_sequence_value` SQL function, a single
//! `INSERT .. ON CONFLICT DO UPDATE .. RETURNING` statement, so concurrent
//! callers on one scope are serialized by the row lock across every server
//! instance sharing the database.

use std::collections::HashMap;

use async_trait::async_trait;
use complihr_core::sequencing::{
    IdCategory, OrganizationProfile, SequenceError, SequenceScope, SequenceStore,
};
use complihr_shared::types::OrganizationId;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    Statement,
};
use tracing::error;

use super::organization_settings::{
    OrganizationSettingsRepository, legacy_counter_for, pattern_for,
};
use crate::entities::{id_sequences, organization_settings, organizations};

const NEXT_VALUE_SQL: &str = "SELECT next_id_sequence_value($1, $2, $3, $4) AS value";

#[derive(Debug, FromQueryResult)]
struct IssuedValue {
    value: i64,
}

fn storage_error(err: DbErr) -> SequenceError {
    error!(error = %err, "Sequence storage failure");
    SequenceError::StorageUnavailable(err.to_string())
}

fn to_sequence(value: i64) -> Result<u64, SequenceError> {
    u64::try_from(value).map_err(|_| {
        SequenceError::StorageUnavailable(format!("sequence counter out of range: {value}"))
    })
}

/// Sequence counters and patterns stored in PostgreSQL.
#[derive(Debug, Clone)]
pub struct IdSequenceRepository {
    db: DatabaseConnection,
    settings: OrganizationSettingsRepository,
}

impl IdSequenceRepository {
    /// Creates a new sequence repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            settings: OrganizationSettingsRepository::new(db.clone()),
            db,
        }
    }

    /// Counter row for a scope, if any value has been issued in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_scope(
        &self,
        scope: &SequenceScope,
    ) -> Result<Option<id_sequences::Model>, DbErr> {
        id_sequences::Entity::find()
            .filter(id_sequences::Column::OrganizationId.eq(scope.organization_id.into_inner()))
            .filter(id_sequences::Column::SequenceType.eq(scope.category.as_str()))
            .filter(id_sequences::Column::Year.eq(scope.storage_year()))
            .filter(id_sequences::Column::Month.eq(scope.storage_month()))
            .one(&self.db)
            .await
    }

    async fn legacy_seed(&self, scope: &SequenceScope) -> Result<i64, DbErr> {
        if !scope.is_lifetime() {
            return Ok(0);
        }
        Ok(self
            .settings
            .find_by_organization(scope.organization_id.into_inner())
            .await?
            .map_or(0, |settings| legacy_counter_for(&settings, scope.category)))
    }
}

#[async_trait]
impl SequenceStore for IdSequenceRepository {
    async fn load_profile(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Option<OrganizationProfile>, SequenceError> {
        let found = organizations::Entity::find_by_id(organization_id.into_inner())
            .find_also_related(organization_settings::Entity)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(found.map(|(org, settings)| {
            let patterns: HashMap<IdCategory, String> = settings
                .map(|settings| {
                    IdCategory::ALL
                        .into_iter()
                        .filter_map(|category| {
                            pattern_for(&settings, category)
                                .map(|pattern| (category, pattern.to_string()))
                        })
                        .collect()
                })
                .unwrap_or_default();

            OrganizationProfile {
                organization_id,
                code: org.code,
                timezone: org.timezone,
                is_active: org.is_active,
                patterns,
            }
        }))
    }

    async fn save_pattern(
        &self,
        organization_id: OrganizationId,
        category: IdCategory,
        pattern: Option<&str>,
    ) -> Result<bool, SequenceError> {
        self.settings
            .update_pattern(
                organization_id.into_inner(),
                category,
                pattern.map(str::to_string),
            )
            .await
            .map_err(storage_error)
    }

    async fn next_value(&self, scope: &SequenceScope) -> Result<u64, SequenceError> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            NEXT_VALUE_SQL,
            [
                scope.organization_id.into_inner().into(),
                scope.category.as_str().into(),
                scope.storage_year().into(),
                scope.storage_month().into(),
            ],
        );

        let issued = IssuedValue::find_by_statement(statement)
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| {
                SequenceError::StorageUnavailable("sequence increment returned no row".into())
            })?;

        to_sequence(issued.value)
    }

    async fn current_value(&self, scope: &SequenceScope) -> Result<u64, SequenceError> {
        let value = match self.find_scope(scope).await.map_err(storage_error)? {
            Some(row) => row.current_value,
            None => self.legacy_seed(scope).await.map_err(storage_error)?,
        };
        to_sequence(value)
    }
}

#[cfg(test)]
mod tests {
    use super::to_sequence;
    use complihr_core::sequencing::SequenceError;

    #[test]
    fn test_to_sequence_rejects_negative() {
        assert_eq!(to_sequence(42).unwrap(), 42);
        assert!(matches!(
            to_sequence(-1),
            Err(SequenceError::StorageUnavailable(_))
        ));
    }
}
