//! AppointmentService snapshot entity model
//!
//! Child rows of an appointment freezing each service's price and duration
//! as they were at booking time.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// AppointmentService entity holding one service snapshot
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "appointment_services")]
pub struct Model {
    /// Unique identifier for the snapshot row (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Appointment this snapshot belongs to
    pub appointment_id: Uuid,

    /// Service that was booked
    pub service_id: Uuid,

    /// Price of the service at booking time
    pub price_snapshot: Decimal,

    /// Duration of the service at booking time, in minutes
    pub duration_snapshot: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::appointment::Entity",
        from = "Column::AppointmentId",
        to = "super::appointment::Column::Id"
    )]
    Appointment,
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id"
    )]
    Service,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
