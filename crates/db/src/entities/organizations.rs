//! `SeaORM` Entity for organizations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::organization_settings::Entity")]
    OrganizationSettings,
    #[sea_orm(has_many = "super::id_sequences::Entity")]
    IdSequences,
}

impl Related<super::organization_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrganizationSettings.def()
    }
}

impl Related<super::id_sequences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IdSequences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
