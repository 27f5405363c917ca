//! Appointment entity model
//!
//! The central entity of the booking engine. For a fixed staff member the
//! set of rows with status `scheduled` is pairwise non-overlapping on
//! `[start_at, end_at)`; only the booking transaction may create or move
//! scheduled rows.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Status strings stored in the `status` column.
pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_DONE: &str = "done";
pub const STATUS_NO_SHOW: &str = "no_show";
pub const STATUS_CANCELED: &str = "canceled";

/// Values stored in the `canceled_by` column.
pub const CANCELED_BY_CLIENT: &str = "client";
pub const CANCELED_BY_STAFF: &str = "staff";

/// Appointment entity representing a booked time slot
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    /// Unique identifier for the appointment (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Client who booked the appointment
    pub client_id: Uuid,

    /// Staff member the appointment is with
    pub staff_id: Uuid,

    /// Appointment start
    pub start_at: DateTimeWithTimeZone,

    /// Appointment end; start_at + sum of snapshot durations
    pub end_at: DateTimeWithTimeZone,

    /// Current status (scheduled|done|no_show|canceled)
    pub status: String,

    /// Sum of service prices captured at booking time
    pub total_price: Decimal,

    /// Reason recorded when the appointment was canceled
    pub cancel_reason: Option<String>,

    /// Who canceled the appointment (client|staff)
    pub canceled_by: Option<String>,

    /// Timestamp when the appointment was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the appointment was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClientId",
        to = "super::user::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StaffId",
        to = "super::user::Column::Id"
    )]
    Staff,
    #[sea_orm(has_many = "super::appointment_service::Entity")]
    AppointmentServices,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::appointment_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppointmentServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
