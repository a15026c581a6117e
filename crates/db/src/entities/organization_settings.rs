//! `SeaORM` Entity for organization_settings table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub organization_id: Uuid,
    pub employee_id_pattern: Option<String>,
    pub payroll_id_pattern: Option<String>,
    pub leave_id_pattern: Option<String>,
    pub expense_id_pattern: Option<String>,
    pub shift_id_pattern: Option<String>,
    pub department_code_pattern: Option<String>,
    pub employee_counter: i64,
    pub payroll_counter: i64,
    pub leave_counter: i64,
    pub expense_counter: i64,
    pub shift_counter: i64,
    pub department_code_counter: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organizations,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
