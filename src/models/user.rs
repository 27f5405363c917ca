//! User entity model
//!
//! Principals within a tenant: clients who book appointments and staff or
//! admin members who own calendars. Authentication happens upstream; the
//! table only records identity and the bookable flag for staff.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Role strings stored in the `role` column.
pub const ROLE_CLIENT: &str = "client";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ADMIN: &str = "admin";

/// User entity representing a tenant-scoped principal
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Display name
    pub name: String,

    /// Contact email, used by the notification collaborator
    pub email: String,

    /// Role within the tenant (client|staff|admin)
    pub role: String,

    /// Whether a staff member currently accepts bookings
    pub bookable_active: bool,

    /// Timestamp when the user was created
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether this principal can own a calendar (staff and admin both can).
    pub fn is_staff_like(&self) -> bool {
        self.role == ROLE_STAFF || self.role == ROLE_ADMIN
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
