//! `SeaORM` Entity for students table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub student_number: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub year_level: Option<String>,
    pub section: Option<String>,
    pub program: Option<String>,
    pub course: Option<String>,
    pub contact_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::clearances::Entity")]
    Clearances,
}

impl Related<super::clearances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clearances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
