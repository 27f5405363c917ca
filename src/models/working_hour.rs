//! WorkingHour entity model
//!
//! Recurring weekly open intervals per staff member. Weekday 0 is Sunday,
//! matching `chrono::Weekday::num_days_from_sunday`.

use chrono::NaiveTime;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// WorkingHour entity representing one recurring open interval
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "working_hours")]
pub struct Model {
    /// Unique identifier for the range (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Staff member this range belongs to
    pub staff_id: Uuid,

    /// Weekday 0 (Sunday) through 6 (Saturday)
    pub weekday: i16,

    /// Opening time of day, strictly before end_time
    pub start_time: NaiveTime,

    /// Closing time of day
    pub end_time: NaiveTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StaffId",
        to = "super::user::Column::Id"
    )]
    Staff,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
