//! Organization repository for database operations.

use chrono_tz::Tz;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{organization_settings, organizations};

/// Error types for organization operations.
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// Code is not 2-10 uppercase letters or digits.
    #[error("Invalid organization code '{0}': expected 2-10 uppercase letters or digits")]
    InvalidCode(String),

    /// Code already used by another organization.
    #[error("Organization code '{0}' already exists")]
    DuplicateCode(String),

    /// Timezone is not a known IANA name.
    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an organization.
#[derive(Debug, Clone)]
pub struct CreateOrganizationInput {
    /// Display name.
    pub name: String,
    /// Short code substituted for `{ORG}` in identifiers.
    pub code: String,
    /// IANA timezone.
    pub timezone: String,
}

/// Returns true for 2-10 ASCII uppercase letters or digits.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    (2..=10).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Organization repository.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an organization by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Checks if a code is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn code_exists(&self, code: &str) -> Result<bool, DbErr> {
        let count = organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates an organization together with its (empty) settings row.
    ///
    /// # Errors
    ///
    /// Returns an error if the code or timezone is invalid, the code is taken,
    /// or the insert fails.
    pub async fn create(
        &self,
        input: CreateOrganizationInput,
    ) -> Result<organizations::Model, OrganizationError> {
        if !is_valid_code(&input.code) {
            return Err(OrganizationError::InvalidCode(input.code));
        }
        if input.timezone.parse::<Tz>().is_err() {
            return Err(OrganizationError::InvalidTimezone(input.timezone));
        }
        if self.code_exists(&input.code).await? {
            return Err(OrganizationError::DuplicateCode(input.code));
        }

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let org_id = Uuid::now_v7();

        let org = organizations::ActiveModel {
            id: Set(org_id),
            name: Set(input.name),
            code: Set(input.code),
            timezone: Set(input.timezone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        organization_settings::ActiveModel {
            id: Set(Uuid::now_v7()),
            organization_id: Set(org_id),
            employee_id_pattern: Set(None),
            payroll_id_pattern: Set(None),
            leave_id_pattern: Set(None),
            expense_id_pattern: Set(None),
            shift_id_pattern: Set(None),
            department_code_pattern: Set(None),
            employee_counter: Set(0),
            payroll_counter: Set(0),
            leave_counter: Set(0),
            expense_counter: Set(0),
            shift_counter: Set(0),
            department_code_counter: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(organization_id = %org.id, code = %org.code, "Organization created");

        Ok(org)
    }

    /// Activates or deactivates an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization does not exist or the update fails.
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<organizations::Model, OrganizationError> {
        let org = self
            .find_by_id(id)
            .await?
            .ok_or(OrganizationError::NotFound(id))?;

        let mut active: organizations::ActiveModel = org.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
