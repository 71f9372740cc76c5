//! `SeaORM` entity definitions.

pub mod clearance_approvers;
pub mod clearances;
pub mod sea_orm_active_enums;
pub mod students;
