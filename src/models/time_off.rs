//! TimeOff entity model
//!
//! One-off closed intervals (vacation, breaks) per staff member. Unlike
//! working hours these are timestamped, not recurring.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// TimeOff entity representing one closed interval for a staff member
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "time_off")]
pub struct Model {
    /// Unique identifier for the time-off row (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Staff member this interval belongs to
    pub staff_id: Uuid,

    /// Interval start, strictly before end_at
    pub start_at: DateTimeWithTimeZone,

    /// Interval end
    pub end_at: DateTimeWithTimeZone,

    /// Optional human-readable reason
    pub reason: Option<String>,
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
