//! Per-category pattern columns and legacy counters on `organization_settings`.

use complihr_core::sequencing::IdCategory;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{organization_settings, organizations};

/// Stored custom pattern for `category`.
#[must_use]
pub fn pattern_for(settings: &organization_settings::Model, category: IdCategory) -> Option<&str> {
    let pattern = match category {
        IdCategory::Employee => &settings.employee_id_pattern,
        IdCategory::Payroll => &settings.payroll_id_pattern,
        IdCategory::Leave => &settings.leave_id_pattern,
        IdCategory::Expense => &settings.expense_id_pattern,
        IdCategory::Shift => &settings.shift_id_pattern,
        IdCategory::DepartmentCode => &settings.department_code_pattern,
    };
    pattern.as_deref()
}

/// Legacy counter for `category`.
#[must_use]
pub const fn legacy_counter_for(
    settings: &organization_settings::Model,
    category: IdCategory,
) -> i64 {
    match category {
        IdCategory::Employee => settings.employee_counter,
        IdCategory::Payroll => settings.payroll_counter,
        IdCategory::Leave => settings.leave_counter,
        IdCategory::Expense => settings.expense_counter,
        IdCategory::Shift => settings.shift_counter,
        IdCategory::DepartmentCode => settings.department_code_counter,
    }
}

fn set_pattern(
    active: &mut organization_settings::ActiveModel,
    category: IdCategory,
    pattern: Option<String>,
) {
    let value = Set(pattern);
    match category {
        IdCategory::Employee => active.employee_id_pattern = value,
        IdCategory::Payroll => active.payroll_id_pattern = value,
        IdCategory::Leave => active.leave_id_pattern = value,
        IdCategory::Expense => active.expense_id_pattern = value,
        IdCategory::Shift => active.shift_id_pattern = value,
        IdCategory::DepartmentCode => active.department_code_pattern = value,
    }
}

fn set_legacy_counter(
    active: &mut organization_settings::ActiveModel,
    category: IdCategory,
    value: i64,
) {
    let value = Set(value);
    match category {
        IdCategory::Employee => active.employee_counter = value,
        IdCategory::Payroll => active.payroll_counter = value,
        IdCategory::Leave => active.leave_counter = value,
        IdCategory::Expense => active.expense_counter = value,
        IdCategory::Shift => active.shift_counter = value,
        IdCategory::DepartmentCode => active.department_code_counter = value,
    }
}

/// Organization settings repository.
#[derive(Debug, Clone)]
pub struct OrganizationSettingsRepository {
    db: DatabaseConnection,
}

impl OrganizationSettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the settings row of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<organization_settings::Model>, DbErr> {
        organization_settings::Entity::find()
            .filter(organization_settings::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }

    /// Stores or clears the pattern for one category.
    ///
    /// Creates the settings row if the organization has none. Returns
    /// `Ok(false)` if the organization does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_pattern(
        &self,
        organization_id: Uuid,
        category: IdCategory,
        pattern: Option<String>,
    ) -> Result<bool, DbErr> {
        let Some((mut active, is_new)) = self.find_or_init(organization_id).await? else {
            return Ok(false);
        };

        set_pattern(&mut active, category, pattern);
        active.updated_at = Set(chrono::Utc::now().into());
        if is_new {
            active.insert(&self.db).await?;
        } else {
            active.update(&self.db).await?;
        }

        Ok(true)
    }

    /// Sets a legacy counter. Used when importing organizations whose IDs
    /// were issued before per-scope sequences existed.
    ///
    /// Returns `Ok(false)` if the organization does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn update_legacy_counter(
        &self,
        organization_id: Uuid,
        category: IdCategory,
        value: i64,
    ) -> Result<bool, DbErr> {
        let Some((mut active, is_new)) = self.find_or_init(organization_id).await? else {
            return Ok(false);
        };

        set_legacy_counter(&mut active, category, value);
        active.updated_at = Set(chrono::Utc::now().into());
        if is_new {
            active.insert(&self.db).await?;
        } else {
            active.update(&self.db).await?;
        }

        Ok(true)
    }

    /// Existing settings as an active model, or a fresh one (flagged `true`)
    /// for an organization that has none yet.
    async fn find_or_init(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<(organization_settings::ActiveModel, bool)>, DbErr> {
        if let Some(settings) = self.find_by_organization(organization_id).await? {
            return Ok(Some((settings.into(), false)));
        }

        if organizations::Entity::find_by_id(organization_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let now = chrono::Utc::now().into();
        let settings = organization_settings::ActiveModel {
            id: Set(Uuid::now_v7()),
            organization_id: Set(organization_id),
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
        };
        Ok(Some((settings, true)))
    }
}
