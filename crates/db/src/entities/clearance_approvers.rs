//! `SeaORM` Entity for clearance_approvers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ApprovalStepStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clearance_approvers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub clearance_id: Uuid,
    pub approver_role: String,
    pub approver_name: String,
    pub position: i32,
    pub status: ApprovalStepStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clearances::Entity",
        from = "Column::ClearanceId",
        to = "super::clearances::Column::Id",
        on_delete = "Cascade"
    )]
    Clearances,
}

impl Related<super::clearances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clearances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
